//! Negotiation runtime - conversation state and LLM orchestration
//!
//! This crate is the working half of parley: it owns the per-conversation
//! state store, talks to the text-generation collaborator, and runs the
//! turn loop that ties them together:
//!
//! 1. **State lookup** (`store`) - find or lazily create the conversation
//! 2. **Inbound signals** - detect the staff's first price offer
//! 3. **Generation** (`llm`) - prompt the collaborator, degrade on failure
//! 4. **Reply signals** - mine the generated reply back into state
//!
//! # Key Types
//!
//! - `NegotiationRuntime` - the turn loop (see `runtime` module)
//! - `LlmClient` - pluggable collaborator trait; `GeminiClient` is the
//!   production implementation
//! - `ConversationStore` - identifier-keyed state with per-conversation
//!   locking, so concurrent turns for one conversation serialize instead
//!   of losing updates
//!
//! The collaborator is strictly a language generator. Negotiation facts
//! (prices, phases, benefit flags) are extracted and tracked
//! deterministically by `parley-core`.

pub mod llm;
pub mod runtime;
pub mod store;
