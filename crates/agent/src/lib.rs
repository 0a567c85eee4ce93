//! Brief parsing - turns free-text shopping requests into structured briefs.
//!
//! This crate is the only place natural language enters the system. It offers
//! two interchangeable parsers behind one runtime:
//!
//! 1. **LLM extraction** (`llm`) - a Gemini `generateContent` call that asks
//!    the model to emit brief JSON and nothing else.
//! 2. **Rule-based extraction** (`rules`) - deterministic keyword and token
//!    scanning, no network, no API key.
//!
//! The `BriefParser` runtime (`runtime`) prefers the LLM when configured and
//! falls back to the rules on ANY failure: transport errors, malformed JSON,
//! or briefs that fail validation. Parsing therefore never fails as a whole.
//!
//! # Safety Principle
//!
//! The LLM is strictly a translator. It NEVER scores products, selects carts,
//! or touches budgets beyond reading them out of the request text. Those are
//! deterministic decisions made by `outfitter-core`.

pub mod llm;
pub mod rules;
pub mod runtime;

pub use llm::{GeminiClient, LlmClient};
pub use runtime::{BriefParser, ParseMethod, ParsedBrief};
