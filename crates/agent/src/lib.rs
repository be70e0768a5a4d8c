//! Generative trend matching
//!
//! Asks a hosted model to match products to trends and falls back to the
//! deterministic matcher from `trendfit-core` whenever that path is off or
//! fails.
//!
//! # Flow
//!
//! 1. **Prompt** (`prompt`) - embed products and trends in an analyst prompt
//! 2. **Completion** (`llm`) - `LlmClient` call, Gemini over HTTP by default
//! 3. **Validation** (`service`) - decode the JSON and check it covers every
//!    product exactly once with sane confidences
//! 4. **Fallback** (`service`) - any failure above yields the rule-based report
//!
//! The model never gets the last word on report shape: a reply that breaks the
//! report invariants is discarded, not repaired.

pub mod llm;
pub mod prompt;
pub mod service;

pub use llm::{GeminiClient, LlmClient};
pub use service::{parse_ai_report, AiFailure, TrendMatchService};
