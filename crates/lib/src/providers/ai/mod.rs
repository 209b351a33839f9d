pub mod anthropic;

use crate::errors::ProviderError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with an AI completion provider.
///
/// This defines the single seam between the pipeline and the language model:
/// a system instruction plus a user prompt in, free-form reply text out. The
/// pipeline treats the reply as untrusted and does its own parsing.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a completion for the given system and user prompts.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError>;
}

dyn_clone::clone_trait_object!(AiProvider);
