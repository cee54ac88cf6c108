//! End-to-end tests for the editing session.

use async_trait::async_trait;
use forge_archive::{ArchiveFormat, DirectorySink};
use forge_core::traits::{CompletionProvider, CompletionRequest};
use forge_core::{ChatMessage, Error, ForgeConfig, Result, Role};
use forge_library::{FileStore, LibraryStore};
use forge_workbench::{ApplyOutcome, GREETING, View, Workbench};
use std::sync::Mutex;
use tempfile::TempDir;

const REPLY: &str = r#"Here is the package.

[FILE: dcf/SKILL.md]
---
name: dcf-valuation
description: Five year DCF with sensitivity tables
---
# Instructions
Run the model script.
[FILE: dcf/scripts/model.py]
```python
def wacc(e, d):
    return e / (e + d)
```
"#;

/// Records every request and replies with a fixed text.
struct Recording {
    reply: &'static str,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl Recording {
    fn new(reply: &'static str) -> Self {
        Self {
            reply,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionProvider for Recording {
    fn name(&self) -> &str {
        "recording"
    }

    async fn complete(
        &self,
        request: CompletionRequest<'_>,
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<()> {
        self.seen.lock().unwrap().push(request.history.to_vec());
        for line in self.reply.split_inclusive('\n') {
            on_chunk(line);
        }
        Ok(())
    }
}

/// Always fails as if the network were down.
struct Offline;

#[async_trait]
impl CompletionProvider for Offline {
    fn name(&self) -> &str {
        "offline"
    }

    async fn complete(
        &self,
        _request: CompletionRequest<'_>,
        _on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<()> {
        Err(Error::upstream("offline", "network unreachable"))
    }
}

/// A reply with file blocks becomes the draft, and the draft can be
/// exported and saved.
#[tokio::test]
async fn test_generate_export_save() {
    let temp = TempDir::new().unwrap();
    let mut bench = Workbench::new(&ForgeConfig::default()).unwrap();
    let provider = Recording::new(REPLY);

    let reply = bench.send("build a dcf skill", &provider).await.unwrap();
    assert_eq!(
        reply.outcome,
        ApplyOutcome::Applied {
            files: 2,
            name: "dcf-valuation".to_string()
        }
    );
    assert_eq!(bench.view(), View::Workbench);
    assert_eq!(
        bench.draft().files()[1].content(),
        "def wacc(e, d):\n    return e / (e + d)"
    );

    bench.set_export_format(ArchiveFormat::TarGz);
    let mut sink = DirectorySink::new(temp.path().join("downloads"));
    let archive = bench.export(&mut sink).unwrap();
    assert_eq!(archive.file_name, "dcf-valuation.tar.gz");
    assert!(temp.path().join("downloads/dcf-valuation.tar.gz").is_file());

    let mut library = LibraryStore::open(FileStore::new(temp.path().join("data")).unwrap());
    let record = bench.save_to(&mut library).unwrap();
    assert_eq!(record.description, "Five year DCF with sensitivity tables");
    assert_eq!(record.metadata.version, "1.0.0");
    assert!(record.instructions.contains("Run the model script."));
    assert_eq!(bench.view(), View::Directory);
}

/// The history sent with a prompt holds the earlier turns only.
#[tokio::test]
async fn test_history_excludes_new_prompt() {
    let mut bench = Workbench::new(&ForgeConfig::default()).unwrap();
    let provider = Recording::new("Sure.");

    bench.send("first", &provider).await.unwrap();
    bench.send("second", &provider).await.unwrap();

    let seen = provider.seen.lock().unwrap();
    assert_eq!(seen[0].len(), 1);
    assert_eq!(seen[0][0].text, GREETING);
    assert_eq!(seen[1].len(), 3);
    assert_eq!(seen[1][1].role, Role::User);
    assert_eq!(seen[1][1].text, "first");
    assert_eq!(bench.history().len(), 5);
}

/// A failed completion leaves the draft and export name untouched.
#[tokio::test]
async fn test_upstream_failure_keeps_draft() {
    let mut bench = Workbench::new(&ForgeConfig::default()).unwrap();
    bench.send("build", &Recording::new(REPLY)).await.unwrap();
    let before = bench.draft().clone();

    let err = bench.send("change it", &Offline).await.unwrap_err();

    assert!(err.is_upstream_unavailable());
    assert!(err.is_recoverable());
    assert_eq!(bench.draft(), &before);
    assert_eq!(bench.export_name(), "dcf-valuation");
    assert_eq!(bench.history().last().unwrap().role, Role::Model);
}

/// A saved record reopens as an equivalent draft in a new session.
#[tokio::test]
async fn test_reopen_saved_record() {
    let temp = TempDir::new().unwrap();
    let record = {
        let mut bench = Workbench::new(&ForgeConfig::default()).unwrap();
        bench.send("build", &Recording::new(REPLY)).await.unwrap();
        let mut library = LibraryStore::open(FileStore::new(temp.path()).unwrap());
        bench.save_to(&mut library).unwrap()
    };

    let library = LibraryStore::open(FileStore::new(temp.path()).unwrap());
    let stored = library.lookup(&record.id.as_str()[..6]).unwrap();

    let mut bench = Workbench::new(&ForgeConfig::default()).unwrap();
    bench.open_record(stored);
    assert_eq!(bench.draft().len(), 2);
    assert_eq!(bench.draft().draft_name(), "dcf-valuation");
}

/// The bundled command provider works end to end.
#[cfg(unix)]
#[tokio::test]
async fn test_command_provider_reply() {
    use forge_workbench::CommandProvider;

    let script = "cat > /dev/null; printf '[FILE: SKILL.md]\\nname: piped-kit\\n'";
    let provider = CommandProvider::new("sh", ["-c", script]);
    let mut bench = Workbench::new(&ForgeConfig::default()).unwrap();

    let reply = bench.send("anything", &provider).await.unwrap();

    assert!(reply.outcome.is_applied());
    assert_eq!(bench.export_name(), "piped-kit");
}
