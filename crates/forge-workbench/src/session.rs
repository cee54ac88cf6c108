//! The editing session.
//!
//! A [`Workbench`] owns the draft, the conversation and the export
//! settings. Every operation either completes or leaves the draft exactly
//! as it was.

use crate::buffer::ResponseBuffer;
use crate::cookbook::CookbookPattern;
use crate::prompt::{CONNECTION_ERROR_MESSAGE, DEFAULT_SYSTEM_INSTRUCTION, GREETING};
use forge_archive::{Archive, ArchiveBuilder, ArchiveFormat, DownloadSink, export};
use forge_core::traits::{CompletionProvider, CompletionRequest, KeyValueStore};
use forge_core::{ChatMessage, Error, ForgeConfig, Result};
use forge_files::{FileRecord, FileSet};
use forge_library::{LibraryStore, SkillRecord};
use forge_parser::{contains_file_marker, parse, parse_strict};
use std::fmt;

/// Which part of the front end is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    /// Landing page.
    #[default]
    Overview,
    /// Draft files and preview.
    Workbench,
    /// Saved library.
    Directory,
    /// Built-in patterns.
    Cookbook,
    /// Settings and maintenance.
    Settings,
}

impl View {
    /// Lowercase view name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Workbench => "workbench",
            Self::Directory => "directory",
            Self::Cookbook => "cookbook",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of feeding text to the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The draft was replaced.
    Applied {
        /// Number of files now in the draft.
        files: usize,
        /// Resolved package name.
        name: String,
    },
    /// The text held no file blocks; nothing changed.
    NoFiles,
}

impl ApplyOutcome {
    /// Returns `true` if the draft was replaced.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// A completed chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Full assistant text.
    pub text: String,
    /// What happened to the draft.
    pub outcome: ApplyOutcome,
}

/// An editing session.
///
/// # Examples
///
/// ```
/// use forge_core::ForgeConfig;
/// use forge_workbench::{ApplyOutcome, View, Workbench};
///
/// let mut bench = Workbench::new(&ForgeConfig::default()).unwrap();
/// assert_eq!(bench.view(), View::Overview);
///
/// let outcome = bench
///     .apply_generated("[FILE: SKILL.md]\nname: ratio-kit\n[FILE: run.py]\nprint()")
///     .unwrap();
///
/// assert_eq!(outcome, ApplyOutcome::Applied { files: 2, name: "ratio-kit".to_string() });
/// assert_eq!(bench.export_name(), "ratio-kit");
/// assert_eq!(bench.view(), View::Workbench);
/// ```
#[derive(Debug)]
pub struct Workbench {
    draft: FileSet,
    export_name: String,
    export_format: ArchiveFormat,
    package_fallback: String,
    view: View,
    history: Vec<ChatMessage>,
    system_instruction: String,
    strict: bool,
}

impl Workbench {
    /// Creates a session from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configured export format is
    /// unknown.
    pub fn new(config: &ForgeConfig) -> Result<Self> {
        let export_format =
            config
                .export
                .format
                .parse::<ArchiveFormat>()
                .map_err(|e| Error::ConfigError {
                    message: format!("export.format: {e}"),
                })?;

        Ok(Self {
            draft: FileSet::with_name(config.parser.fallback_name.clone()),
            export_name: String::new(),
            export_format,
            package_fallback: config.export.package_name.clone(),
            view: View::Overview,
            history: vec![ChatMessage::model(GREETING)],
            system_instruction: config
                .provider
                .system_instruction
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTION.to_string()),
            strict: config.parser.strict,
        })
    }

    /// The current draft.
    #[must_use]
    pub const fn draft(&self) -> &FileSet {
        &self.draft
    }

    /// Selects the draft file at `index` for preview.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `index` is out of range.
    pub fn select_file(&mut self, index: usize) -> Result<&FileRecord> {
        self.draft
            .select(index)
            .map_err(|e| Error::InvalidArgument(e.to_string()))
    }

    /// Name used for exported archives.
    #[must_use]
    pub fn export_name(&self) -> &str {
        &self.export_name
    }

    /// Overrides the export name.
    pub fn set_export_name(&mut self, name: impl Into<String>) {
        self.export_name = name.into();
    }

    /// Format used for exported archives.
    #[must_use]
    pub const fn export_format(&self) -> ArchiveFormat {
        self.export_format
    }

    /// Changes the export format.
    pub const fn set_export_format(&mut self, format: ArchiveFormat) {
        self.export_format = format;
    }

    /// The current view.
    #[must_use]
    pub const fn view(&self) -> View {
        self.view
    }

    /// Switches view.
    pub const fn set_view(&mut self, view: View) {
        self.view = view;
    }

    /// Conversation so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Replaces the draft with the file blocks found in `text`.
    ///
    /// The current draft name is the fallback package name. Text without
    /// blocks changes nothing, including the view.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`Error::MalformedFileBlock`] for text the
    /// permissive parser would partly skip; the draft is unchanged.
    pub fn apply_generated(&mut self, text: &str) -> Result<ApplyOutcome> {
        let fallback = self.draft.draft_name();
        let bundle = if self.strict {
            parse_strict(text, fallback)?
        } else {
            parse(text, fallback)
        };

        let Some(bundle) = bundle else {
            return Ok(ApplyOutcome::NoFiles);
        };

        let files = bundle.files.len();
        let name = bundle.resolved_name;
        self.draft.replace_all(bundle.files, name.clone());
        self.export_name.clone_from(&name);
        self.view = View::Workbench;

        tracing::info!(files, name = %name, "draft updated from generated content");
        Ok(ApplyOutcome::Applied { files, name })
    }

    /// Sends one prompt and applies any files in the reply.
    ///
    /// # Errors
    ///
    /// See [`send_streaming`](Self::send_streaming).
    pub async fn send(&mut self, prompt: &str, provider: &dyn CompletionProvider) -> Result<Reply> {
        self.send_streaming(prompt, provider, &mut |_: &str| {}).await
    }

    /// Sends one prompt, forwarding reply chunks to `observer` as they
    /// arrive, then applies any files in the complete reply.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] for a blank prompt
    /// - [`Error::UpstreamUnavailable`] if the provider fails or returns
    ///   no text; an assistant error turn is recorded and the draft is
    ///   unchanged
    /// - [`Error::MalformedFileBlock`] in strict mode, after the turn is
    ///   recorded
    pub async fn send_streaming(
        &mut self,
        prompt: &str,
        provider: &dyn CompletionProvider,
        observer: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<Reply> {
        if prompt.trim().is_empty() {
            return Err(Error::InvalidArgument("prompt cannot be empty".to_string()));
        }
        let mut buffer = ResponseBuffer::new(self.draft.draft_name());
        let result = {
            let request = CompletionRequest {
                system_instruction: &self.system_instruction,
                history: &self.history,
                prompt,
            };
            provider
                .complete(request, &mut |chunk: &str| {
                    if buffer.push(chunk) {
                        for path in buffer.preview().diff.added {
                            tracing::info!(%path, "receiving file");
                        }
                    }
                    observer(chunk);
                })
                .await
        };
        self.history.push(ChatMessage::user(prompt));

        let failure = match result {
            Err(e) => Some(e),
            Ok(()) if buffer.is_blank() => {
                Some(Error::upstream(provider.name(), "empty response"))
            }
            Ok(()) => None,
        };
        if let Some(e) = failure {
            tracing::warn!(provider = provider.name(), error = %e, "completion failed");
            self.history.push(ChatMessage::model(CONNECTION_ERROR_MESSAGE));
            return Err(e);
        }

        let text = buffer.into_text();
        self.history.push(ChatMessage::model(text.clone()));

        let outcome = if contains_file_marker(&text) {
            self.apply_generated(&text)?
        } else {
            ApplyOutcome::NoFiles
        };

        Ok(Reply { text, outcome })
    }

    /// Packages the draft and hands it to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBundle`] for an empty draft and
    /// [`Error::ArchiveWriteError`] if building or delivery fails.
    pub fn export(&self, sink: &mut dyn DownloadSink) -> Result<Archive> {
        let name = if self.export_name.trim().is_empty() {
            &self.package_fallback
        } else {
            &self.export_name
        };
        let builder = ArchiveBuilder::new(self.export_format).with_name(name.as_str());
        export(&builder, &self.draft, sink)
    }

    /// Saves the draft to `library` and switches to the library view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBundle`] for an empty draft, or the storage
    /// error if the library cannot be written.
    pub fn save_to<S: KeyValueStore>(&mut self, library: &mut LibraryStore<S>) -> Result<SkillRecord> {
        let record = library.promote(&self.draft)?;
        self.view = View::Directory;
        Ok(record)
    }

    /// Loads a saved record into the draft.
    pub fn open_record(&mut self, record: &SkillRecord) {
        self.draft = record.to_draft();
        self.export_name.clone_from(&record.name);
        self.view = View::Workbench;
        tracing::info!(id = %record.id, name = %record.name, "opened saved skill");
    }

    /// Scaffolds a cookbook pattern into the draft.
    ///
    /// # Errors
    ///
    /// Same as [`apply_generated`](Self::apply_generated).
    pub fn scaffold(&mut self, pattern: &CookbookPattern) -> Result<ApplyOutcome> {
        self.apply_generated(&pattern.scaffold_text())
    }
}
