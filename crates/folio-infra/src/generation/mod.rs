//! Portfolio HTML generation backends.

mod gemini;
mod prompt;

pub use gemini::{GeminiConfig, GeminiContentGenerator};
pub use prompt::portfolio_prompt;
