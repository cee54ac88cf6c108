//! Collaborator traits.
//!
//! The core depends on two outside capabilities and reaches them only
//! through these seams:
//!
//! - `completion` - a language-model text completion source
//! - `storage` - a key-value store holding the serialized library
//!
//! # Examples
//!
//! ```
//! use forge_core::traits::{CompletionProvider, CompletionRequest};
//! use forge_core::Result;
//! use async_trait::async_trait;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl CompletionProvider for Echo {
//!     fn name(&self) -> &str {
//!         "echo"
//!     }
//!
//!     async fn complete(
//!         &self,
//!         request: CompletionRequest<'_>,
//!         on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
//!     ) -> Result<()> {
//!         on_chunk(request.prompt);
//!         Ok(())
//!     }
//! }
//! ```

mod completion;
mod storage;

pub use completion::{CompletionProvider, CompletionRequest};
pub use storage::{KeyValueStore, MemoryStore};
