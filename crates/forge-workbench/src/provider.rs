//! Completion provider backed by an external program.
//!
//! The program receives the rendered conversation on stdin and answers on
//! stdout. Each stdout line is forwarded as a chunk as soon as it is read.

use async_trait::async_trait;
use forge_core::traits::{CompletionProvider, CompletionRequest};
use forge_core::{Error, ProviderConfig, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

/// Runs a configured command for every completion.
///
/// # Examples
///
/// ```no_run
/// use forge_core::traits::{CompletionProvider, CompletionRequest};
/// use forge_workbench::CommandProvider;
/// use std::time::Duration;
///
/// # async fn run() -> forge_core::Result<()> {
/// let provider = CommandProvider::new("llm", ["--no-stream"]).with_timeout(Duration::from_secs(60));
///
/// let request = CompletionRequest {
///     system_instruction: "Be brief.",
///     history: &[],
///     prompt: "Draft a brand compliance skill",
/// };
/// let mut reply = String::new();
/// provider.complete(request, &mut |chunk: &str| reply.push_str(chunk)).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CommandProvider {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandProvider {
    /// Default time allowed for one completion.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    /// Creates a provider running `program` with `args`.
    pub fn new<I, A>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Builds a provider from the `[provider]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if no command is configured.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let program = config
            .command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::ConfigError {
                message: "no completion command configured (set provider.command)".to_string(),
            })?;
        Ok(Self::new(program, config.args.iter().cloned())
            .with_timeout(Duration::from_secs(config.timeout_secs)))
    }

    /// Sets the time allowed for one completion.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configured program.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    async fn run(
        &self,
        transcript: String,
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.failure(format!("cannot start '{}': {e}", self.program)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.failure("stdin not captured"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| self.failure("stdout not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| self.failure("stderr not captured"))?;

        let writer = tokio::spawn(async move {
            stdin.write_all(transcript.as_bytes()).await?;
            stdin.shutdown().await
        });
        let errors = tokio::spawn(async move {
            let mut text = String::new();
            let _ = stderr.read_to_string(&mut text).await;
            text
        });

        let mut lines = BufReader::new(stdout).lines();
        let mut received = 0usize;
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| self.failure(format!("reading output: {e}")))?
        {
            received += line.len() + 1;
            let mut chunk = line;
            chunk.push('\n');
            on_chunk(&chunk);
        }

        let status = child
            .wait()
            .await
            .map_err(|e| self.failure(format!("waiting for exit: {e}")))?;
        if let Ok(Err(e)) = writer.await {
            tracing::debug!(error = %e, "completion command closed stdin early");
        }
        let stderr_text = errors.await.unwrap_or_default();

        if !status.success() {
            let detail = stderr_text.trim();
            return Err(self.failure(if detail.is_empty() {
                format!("exited with {status}")
            } else {
                format!("exited with {status}: {detail}")
            }));
        }
        if received == 0 {
            return Err(self.failure("produced no output"));
        }

        tracing::debug!(bytes = received, "completion command finished");
        Ok(())
    }

    fn failure(&self, reason: impl Into<String>) -> Error {
        Error::upstream(self.name(), reason)
    }
}

#[async_trait]
impl CompletionProvider for CommandProvider {
    fn name(&self) -> &str {
        &self.program
    }

    async fn complete(
        &self,
        request: CompletionRequest<'_>,
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<()> {
        let transcript = request.render_transcript();
        tracing::debug!(
            program = %self.program,
            turns = request.history.len(),
            "requesting completion"
        );

        tokio::time::timeout(self.timeout, self.run(transcript, on_chunk))
            .await
            .map_err(|_| self.failure(format!("timed out after {}s", self.timeout.as_secs())))?
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn request() -> CompletionRequest<'static> {
        CompletionRequest {
            system_instruction: "sys",
            history: &[],
            prompt: "make a skill",
        }
    }

    async fn collect(provider: &CommandProvider) -> Result<String> {
        let mut text = String::new();
        provider
            .complete(request(), &mut |chunk: &str| text.push_str(chunk))
            .await?;
        Ok(text)
    }

    #[tokio::test]
    async fn test_echoes_transcript() {
        let provider = CommandProvider::new("cat", Vec::<String>::new());
        let text = collect(&provider).await.unwrap();
        assert_eq!(text, "system: sys\nuser: make a skill\n");
    }

    #[tokio::test]
    async fn test_streams_lines() {
        let provider = CommandProvider::new("sh", ["-c", "printf '[FILE: a.md]\\nhello\\n'"]);
        let text = collect(&provider).await.unwrap();
        assert_eq!(text, "[FILE: a.md]\nhello\n");
    }

    #[tokio::test]
    async fn test_missing_program() {
        let provider = CommandProvider::new("definitely-not-a-real-program-4821", Vec::<String>::new());
        let err = collect(&provider).await.unwrap_err();
        assert!(err.is_upstream_unavailable());
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let provider = CommandProvider::new("sh", ["-c", "echo boom >&2; exit 3"]);
        let err = collect(&provider).await.unwrap_err();
        assert!(err.is_upstream_unavailable());
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_empty_output() {
        let provider = CommandProvider::new("true", Vec::<String>::new());
        assert!(collect(&provider).await.unwrap_err().is_upstream_unavailable());
    }

    #[tokio::test]
    async fn test_timeout() {
        let provider =
            CommandProvider::new("sleep", ["5"]).with_timeout(Duration::from_millis(100));
        let err = collect(&provider).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_from_config_requires_command() {
        let config = ProviderConfig::default();
        assert!(CommandProvider::from_config(&config).unwrap_err().is_config_error());

        let config = ProviderConfig {
            command: Some("llm".to_string()),
            args: vec!["-m".to_string(), "local".to_string()],
            timeout_secs: 30,
            ..ProviderConfig::default()
        };
        let provider = CommandProvider::from_config(&config).unwrap();
        assert_eq!(provider.program(), "llm");
        assert_eq!(provider.timeout, Duration::from_secs(30));
    }
}
