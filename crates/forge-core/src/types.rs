//! Strong domain types for skill-forge.
//!
//! # Examples
//!
//! ```
//! use forge_core::{ChatMessage, Role, SkillId};
//!
//! let id = SkillId::generate();
//! assert!(!id.as_str().is_empty());
//!
//! let msg = ChatMessage::user("Build me a DCF skill");
//! assert_eq!(msg.role, Role::User);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque library record identifier (newtype over String).
///
/// Generated once when a draft is promoted and stable thereafter. Stored
/// ids are accepted verbatim, so records written by other tools with a
/// different id scheme stay readable.
///
/// # Examples
///
/// ```
/// use forge_core::SkillId;
///
/// let a = SkillId::generate();
/// let b = SkillId::generate();
/// assert_ne!(a, b);
///
/// let parsed = SkillId::new("k3j9x0a1b");
/// assert_eq!(parsed.as_str(), "k3j9x0a1b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(String);

impl SkillId {
    /// Wraps an existing identifier.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier (UUID v4, simple form).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `SkillId` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SkillId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SkillId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human author.
    User,
    /// The language-model assistant.
    Model,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn of the conversation with the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the turn.
    pub role: Role,
    /// Full text of the turn.
    pub text: String,
    /// Optional reasoning summary returned by some providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
}

impl ChatMessage {
    /// Creates a user turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            thought: None,
        }
    }

    /// Creates an assistant turn.
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            thought: None,
        }
    }
}
