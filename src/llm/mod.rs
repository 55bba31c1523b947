//! Language model seam.
//!
//! The translator and the QA chain only need `prompt -> completion`.
//! Implementations must run at [`MIN_TEMPERATURE`] so identical prompts
//! give the most reproducible completions the provider allows.

pub mod mock;
#[cfg(feature = "groq")]
pub mod groq;

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;

pub use mock::ScriptedModel;
#[cfg(feature = "groq")]
pub use groq::GroqClient;

/// Lowest sampling temperature providers accept.
pub const MIN_TEMPERATURE: f32 = 0.0;

/// Text completion provider.
///
/// Errors: `Error::Connection` when the provider is unreachable or the
/// credentials are rejected, `Error::Model` for anything else.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Sampling temperature this model is configured with.
    fn temperature(&self) -> f32;

    fn name(&self) -> &str;
}

#[async_trait]
impl<T: LanguageModel + ?Sized> LanguageModel for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }

    fn temperature(&self) -> f32 {
        (**self).temperature()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
