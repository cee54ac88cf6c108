//! Saved skill records.
//!
//! # Examples
//!
//! ```
//! use forge_library::SkillRecord;
//!
//! let json = r#"{"id":"abc","name":"ratio-kit"}"#;
//! let record: SkillRecord = serde_json::from_str(json).unwrap();
//!
//! assert_eq!(record.metadata.version, "1.0.0");
//! assert!(record.files.is_empty());
//! ```

use chrono::{DateTime, Utc};
use forge_core::SkillId;
use forge_files::{FileRecord, FileSet};
use serde::{Deserialize, Serialize};

/// Version stamped on newly saved records.
pub const INITIAL_VERSION: &str = "1.0.0";

fn initial_version() -> String {
    INITIAL_VERSION.to_string()
}

/// Structured metadata of a saved skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMetadata {
    /// One-line summary, when one was provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    /// Record version.
    #[serde(default = "initial_version")]
    pub version: String,
    /// Activation keywords. Never populated from content.
    #[serde(default)]
    pub triggers: Vec<String>,
    /// Declared abilities. Never populated from content.
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl Default for SkillMetadata {
    fn default() -> Self {
        Self {
            short_description: None,
            version: initial_version(),
            triggers: Vec::new(),
            capabilities: Vec::new(),
        }
    }
}

/// An immutable snapshot of a draft, saved in the library.
///
/// Saving the same draft twice produces two records with distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    /// Unique identifier.
    pub id: SkillId,
    /// Package name at the time of saving.
    pub name: String,
    /// From the instruction file's `description:` line.
    #[serde(default)]
    pub description: String,
    /// Version, triggers and capabilities.
    #[serde(default)]
    pub metadata: SkillMetadata,
    /// Full text of the instruction file, or empty.
    #[serde(default)]
    pub instructions: String,
    /// Copy of every draft file.
    #[serde(default)]
    pub files: Vec<FileRecord>,
    /// When the record was saved.
    #[serde(default, with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl SkillRecord {
    /// Loads the record's files into a fresh draft named after it.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_library::SkillRecord;
    ///
    /// let record: SkillRecord = serde_json::from_str(
    ///     r#"{"id":"x","name":"kit","files":[{"path":"SKILL.md","content":"name: kit"}]}"#,
    /// )
    /// .unwrap();
    ///
    /// let draft = record.to_draft();
    /// assert_eq!(draft.draft_name(), "kit");
    /// assert_eq!(draft.files()[0].name(), "SKILL.md");
    /// ```
    #[must_use]
    pub fn to_draft(&self) -> FileSet {
        let mut draft = FileSet::with_name(self.name.clone());
        draft.replace_all(self.files.clone(), self.name.clone());
        draft
    }

    /// Number of files in the record.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> SkillRecord {
        SkillRecord {
            id: SkillId::new("id-1"),
            name: "kit".to_string(),
            description: "does things".to_string(),
            metadata: SkillMetadata::default(),
            instructions: "name: kit".to_string(),
            files: vec![FileRecord::new("SKILL.md", "name: kit")],
            updated_at: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
        }
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["id"], "id-1");
        assert_eq!(json["updatedAt"], 1_700_000_000_123_i64);
        assert_eq!(json["metadata"]["version"], "1.0.0");
        assert_eq!(json["metadata"]["triggers"], serde_json::json!([]));
        assert!(json["metadata"].get("shortDescription").is_none());
        assert_eq!(json["files"][0]["language"], "markdown");
    }

    #[test]
    fn test_round_trip_keeps_millis() {
        let json = serde_json::to_string(&record()).unwrap();
        let back: SkillRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record());
    }

    #[test]
    fn test_missing_fields_default() {
        let back: SkillRecord = serde_json::from_str(r#"{"id":"a","name":"b"}"#).unwrap();
        assert_eq!(back.updated_at.timestamp_millis(), 0);
        assert_eq!(back.metadata, SkillMetadata::default());
        assert!(back.instructions.is_empty());
    }

    #[test]
    fn test_to_draft_is_a_copy() {
        let record = record();
        let mut draft = record.to_draft();
        draft.clear();
        assert_eq!(record.file_count(), 1);
    }
}
