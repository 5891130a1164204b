pub mod config;
pub mod negotiation;
pub mod prompt;
pub mod signals;

pub use negotiation::{
    BasicDetails, BenefitFlags, EmotionalState, NegotiationPhase, NegotiationState, Turn,
    MAX_TURN_HISTORY,
};
pub use prompt::build_prompt;
pub use signals::{apply_reply_signals, extract_price};
