use std::sync::Arc;

use parley_core::{apply_reply_signals, build_prompt, extract_price, NegotiationState};
use tracing::{info, warn};

use crate::llm::LlmClient;
use crate::store::ConversationStore;

/// Reply used when the collaborator call itself fails (transport, timeout,
/// non-2xx). The turn still completes; the failure never reaches the caller.
pub const APOLOGY_REPLY: &str =
    "I'm so sorry, I seem to be having a little trouble on my end... could you please say that again?";

/// The negotiation turn loop.
///
/// Owns the conversation store and the generation collaborator; one call to
/// [`NegotiationRuntime::handle_turn`] is one full turn of the dialogue.
pub struct NegotiationRuntime {
    store: ConversationStore,
    llm: Arc<dyn LlmClient>,
}

impl NegotiationRuntime {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { store: ConversationStore::new(), llm }
    }

    /// Runs one negotiation turn and returns the agent's reply.
    ///
    /// The per-conversation lock is held for the whole turn, collaborator
    /// await included, so concurrent turns for one identifier serialize.
    /// A collaborator failure degrades to [`APOLOGY_REPLY`] instead of
    /// surfacing; the reply-signal pass is skipped in that case since the
    /// model produced nothing worth mining.
    pub async fn handle_turn(&self, message: &str, conversation_id: &str) -> String {
        let entry = self.store.get_or_create(conversation_id).await;
        let mut state = entry.lock().await;

        if let Some(price) = extract_price(message) {
            if state.observe_price(price) {
                info!(
                    event_name = "negotiation.price_detected",
                    conversation_id,
                    price = %price,
                    "initial price captured; entering price negotiation"
                );
            }
        }

        let prompt = build_prompt(&state);
        let request = format!("{prompt}\n\nHotel Staff: {message}");

        let (reply, degraded) = match self.llm.complete(&request).await {
            Ok(reply) => (reply, false),
            Err(error) => {
                warn!(
                    event_name = "negotiation.generation_failed",
                    conversation_id,
                    error = %error,
                    "collaborator call failed; degrading to apology reply"
                );
                (APOLOGY_REPLY.to_string(), true)
            }
        };

        if !degraded {
            apply_reply_signals(&mut state, &reply);
        }
        state.push_turn(message, reply.as_str());

        info!(
            event_name = "negotiation.turn.completed",
            conversation_id,
            phase = state.phase.as_str(),
            emotional_state = state.emotional_state.as_str(),
            turn_count = state.turns.len(),
            degraded,
            "negotiation turn completed"
        );

        reply
    }

    /// Forgets the conversation entirely. Unknown identifiers are a no-op;
    /// the next turn for the identifier starts from the default state.
    pub async fn clear_history(&self, conversation_id: &str) {
        self.store.remove(conversation_id).await;
        info!(
            event_name = "negotiation.history.cleared",
            conversation_id, "conversation state removed"
        );
    }

    /// Clones the current state for an identifier, if one exists. Never
    /// creates state as a side effect.
    pub async fn snapshot(&self, conversation_id: &str) -> Option<NegotiationState> {
        let entry = self.store.get(conversation_id).await?;
        let state = entry.lock().await.clone();
        Some(state)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use super::{NegotiationRuntime, APOLOGY_REPLY};
    use crate::llm::{GenerationError, LlmClient};
    use parley_core::prompt::FIRST_CONTACT_PROMPT;
    use parley_core::{EmotionalState, NegotiationPhase};

    #[derive(Default)]
    struct ScriptedLlm {
        prompts: Mutex<Vec<String>>,
        replies: Mutex<VecDeque<Result<String, u16>>>,
    }

    impl ScriptedLlm {
        fn with_replies(replies: Vec<Result<&str, u16>>) -> Arc<Self> {
            Arc::new(Self {
                prompts: Mutex::new(Vec::new()),
                replies: Mutex::new(
                    replies.into_iter().map(|reply| reply.map(str::to_string)).collect(),
                ),
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().expect("prompt lock").clone()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().expect("prompt lock").push(prompt.to_string());
            match self.replies.lock().expect("reply lock").pop_front() {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(status)) => Err(GenerationError::Status { status }),
                None => Ok("okay".to_string()),
            }
        }
    }

    #[tokio::test]
    async fn first_turn_sends_the_first_contact_prompt() {
        let llm = ScriptedLlm::with_replies(vec![Ok("Hello! What a lovely hotel.")]);
        let runtime = NegotiationRuntime::new(llm.clone());

        let reply = runtime.handle_turn("Hi, welcome to the Grand", "default").await;

        assert_eq!(reply, "Hello! What a lovely hotel.");
        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(
            prompts[0],
            format!("{FIRST_CONTACT_PROMPT}\n\nHotel Staff: Hi, welcome to the Grand")
        );
    }

    #[tokio::test]
    async fn inbound_price_fires_the_one_shot_transition() {
        let llm = ScriptedLlm::with_replies(vec![Ok("Lovely to meet you"), Ok("Hmm, let me think")]);
        let runtime = NegotiationRuntime::new(llm.clone());

        runtime.handle_turn("Welcome!", "default").await;
        runtime.handle_turn("We can offer the room at ₹2000 per night", "default").await;

        let state = runtime.snapshot("default").await.expect("state should exist");
        assert_eq!(state.initial_price, Some(Decimal::new(2000, 0)));
        assert_eq!(state.last_offered_price, Some(Decimal::new(2000, 0)));
        assert_eq!(state.phase, NegotiationPhase::PriceNegotiation);

        let prompts = llm.prompts();
        assert!(prompts[1].starts_with("You are continuing a negotiation"));
        assert!(prompts[1].contains("Hotel Staff: Welcome!\nYou: Lovely to meet you\n"));
        assert!(prompts[1].contains("- Current phase: price_negotiation"));
        assert!(prompts[1].ends_with("Hotel Staff: We can offer the room at ₹2000 per night"));
    }

    #[tokio::test]
    async fn a_second_price_never_rewrites_the_first() {
        let llm = ScriptedLlm::with_replies(vec![Ok("Noted"), Ok("Noted again")]);
        let runtime = NegotiationRuntime::new(llm);

        runtime.handle_turn("The rate is ₹2000", "default").await;
        runtime.handle_turn("Fine, Rs. 1,500 then", "default").await;

        let state = runtime.snapshot("default").await.expect("state should exist");
        assert_eq!(state.initial_price, Some(Decimal::new(2000, 0)));
        assert_eq!(state.last_offered_price, Some(Decimal::new(2000, 0)));
    }

    #[tokio::test]
    async fn generated_replies_feed_the_state_machine() {
        let llm = ScriptedLlm::with_replies(vec![Ok(
            "Thank you! The deluxe room with a city view sounds perfect, and breakfast plus wifi would be great.",
        )]);
        let runtime = NegotiationRuntime::new(llm);

        runtime.handle_turn("We have a few options", "default").await;

        let state = runtime.snapshot("default").await.expect("state should exist");
        assert_eq!(state.emotional_state, EmotionalState::Appreciative);
        assert_eq!(state.basic_details.room_type.as_deref(), Some("deluxe"));
        assert_eq!(state.basic_details.view.as_deref(), Some("city"));
        assert!(state.requested_benefits.meals);
        assert!(state.requested_benefits.wifi);
        assert!(state.negotiation_successful);
    }

    #[tokio::test]
    async fn generation_failure_degrades_to_the_apology_reply() {
        let llm = ScriptedLlm::with_replies(vec![Err(503)]);
        let runtime = NegotiationRuntime::new(llm);

        let reply = runtime.handle_turn("Hello there", "default").await;

        assert_eq!(reply, APOLOGY_REPLY);
        let state = runtime.snapshot("default").await.expect("state should exist");
        assert_eq!(state.emotional_state, EmotionalState::Friendly, "signal pass skipped");
        assert!(!state.negotiation_successful);
        assert_eq!(state.turns.len(), 1);
        assert_eq!(state.turns[0].agent_reply, APOLOGY_REPLY);
    }

    #[tokio::test]
    async fn history_stays_capped_across_many_turns() {
        let replies = (0..12).map(|_| Ok("noted")).collect();
        let llm = ScriptedLlm::with_replies(replies);
        let runtime = NegotiationRuntime::new(llm);

        for index in 0..12 {
            runtime.handle_turn(&format!("message {index}"), "default").await;
        }

        let state = runtime.snapshot("default").await.expect("state should exist");
        assert_eq!(state.turns.len(), 10);
        assert_eq!(state.turns[0].hotel_staff, "message 2");
        assert_eq!(state.turns[9].hotel_staff, "message 11");
    }

    #[tokio::test]
    async fn clear_history_is_idempotent_and_resets_the_conversation() {
        let llm = ScriptedLlm::with_replies(vec![Ok("First"), Ok("Fresh start")]);
        let runtime = NegotiationRuntime::new(llm.clone());

        runtime.clear_history("never-seen").await;

        runtime.handle_turn("The rate is ₹900", "default").await;
        runtime.clear_history("default").await;
        runtime.clear_history("default").await;

        runtime.handle_turn("Hello again", "default").await;
        let state = runtime.snapshot("default").await.expect("state should exist");
        assert!(state.initial_price.is_none());
        assert_eq!(state.turns.len(), 1);

        let prompts = llm.prompts();
        assert!(
            prompts[1].starts_with("You are a friendly and professional AI negotiation agent"),
            "post-clear turn starts over with the first-contact prompt"
        );
    }

    #[tokio::test]
    async fn conversations_are_isolated_by_identifier() {
        let llm = ScriptedLlm::with_replies(vec![Ok("a"), Ok("b")]);
        let runtime = NegotiationRuntime::new(llm);

        runtime.handle_turn("Price is ₹1200", "alpha").await;
        runtime.handle_turn("Hello", "beta").await;

        let alpha = runtime.snapshot("alpha").await.expect("alpha state");
        let beta = runtime.snapshot("beta").await.expect("beta state");
        assert_eq!(alpha.initial_price, Some(Decimal::new(1200, 0)));
        assert!(beta.initial_price.is_none());
    }
}
