pub mod google;
pub mod provider;

pub use provider::{LLMAdapter, LLMProviderConfig, LLM};

pub use crate::types::{AppResult, LLMRequest, LLMResponse};
