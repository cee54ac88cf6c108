//! Text completion trait.
//!
//! Defines the seam to the language-model service. The service may answer
//! in one piece or as a sequence of chunks; either way the chunks
//! concatenate to the complete reply, and the core only acts on that
//! complete text.

use crate::{ChatMessage, Result};
use async_trait::async_trait;

/// One completion call: the new prompt plus everything said before it.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    /// Assistant brief sent ahead of the conversation.
    pub system_instruction: &'a str,
    /// Prior turns, oldest first.
    pub history: &'a [ChatMessage],
    /// The new user prompt.
    pub prompt: &'a str,
}

impl CompletionRequest<'_> {
    /// Renders the request as a plain-text transcript.
    ///
    /// Used by providers that talk to programs reading a single text
    /// document rather than structured turns.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::ChatMessage;
    /// use forge_core::traits::CompletionRequest;
    ///
    /// let history = [ChatMessage::user("hi"), ChatMessage::model("hello")];
    /// let request = CompletionRequest {
    ///     system_instruction: "Be brief.",
    ///     history: &history,
    ///     prompt: "make a skill",
    /// };
    ///
    /// let text = request.render_transcript();
    /// assert!(text.starts_with("system: Be brief.\n"));
    /// assert!(text.ends_with("user: make a skill\n"));
    /// ```
    #[must_use]
    pub fn render_transcript(&self) -> String {
        let mut out = String::new();
        if !self.system_instruction.is_empty() {
            out.push_str("system: ");
            out.push_str(self.system_instruction);
            out.push('\n');
        }
        for message in self.history {
            out.push_str(message.role.as_str());
            out.push_str(": ");
            out.push_str(&message.text);
            out.push('\n');
        }
        out.push_str("user: ");
        out.push_str(self.prompt);
        out.push('\n');
        out
    }
}

/// A source of assistant replies.
///
/// Implementations stream the reply by calling `on_chunk` with each piece
/// of text as it arrives, in order.
///
/// # Errors
///
/// Implementations return [`Error::UpstreamUnavailable`](crate::Error::UpstreamUnavailable)
/// when the service cannot be reached or fails mid-stream.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Requests a completion, streaming the reply into `on_chunk`.
    async fn complete(
        &self,
        request: CompletionRequest<'_>,
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct Chunked(Vec<&'static str>);

    #[async_trait]
    impl CompletionProvider for Chunked {
        fn name(&self) -> &str {
            "chunked"
        }

        async fn complete(
            &self,
            _request: CompletionRequest<'_>,
            on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
        ) -> Result<()> {
            for chunk in &self.0 {
                on_chunk(chunk);
            }
            Ok(())
        }
    }

    struct Down;

    #[async_trait]
    impl CompletionProvider for Down {
        fn name(&self) -> &str {
            "down"
        }

        async fn complete(
            &self,
            _request: CompletionRequest<'_>,
            _on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
        ) -> Result<()> {
            Err(Error::upstream(self.name(), "connection refused"))
        }
    }

    fn request() -> CompletionRequest<'static> {
        CompletionRequest {
            system_instruction: "",
            history: &[],
            prompt: "go",
        }
    }

    #[tokio::test]
    async fn test_chunks_concatenate() {
        let provider = Chunked(vec!["[FILE: a", ".txt]\nhel", "lo"]);
        let mut text = String::new();
        provider
            .complete(request(), &mut |chunk: &str| text.push_str(chunk))
            .await
            .unwrap();
        assert_eq!(text, "[FILE: a.txt]\nhello");
    }

    #[tokio::test]
    async fn test_provider_failure() {
        let mut text = String::new();
        let err = Down
            .complete(request(), &mut |chunk: &str| text.push_str(chunk))
            .await
            .unwrap_err();
        assert!(err.is_upstream_unavailable());
        assert!(text.is_empty());
    }

    #[test]
    fn test_render_transcript_without_system() {
        assert_eq!(request().render_transcript(), "user: go\n");
    }
}
