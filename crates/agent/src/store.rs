use std::collections::HashMap;
use std::sync::Arc;

use parley_core::NegotiationState;
use tokio::sync::Mutex;

/// Identifier-keyed registry of live negotiations.
///
/// The registry lock guards only the map itself and is held briefly; each
/// conversation carries its own `Mutex`, which callers hold for the whole
/// turn (including the collaborator await). Two concurrent turns for the
/// same identifier therefore serialize instead of racing a
/// read-modify-write, while distinct conversations proceed in parallel.
#[derive(Default)]
pub struct ConversationStore {
    conversations: Mutex<HashMap<String, Arc<Mutex<NegotiationState>>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state entry for the identifier, creating a default
    /// record on first contact.
    pub async fn get_or_create(&self, conversation_id: &str) -> Arc<Mutex<NegotiationState>> {
        let mut conversations = self.conversations.lock().await;
        conversations.entry(conversation_id.to_string()).or_default().clone()
    }

    /// Returns the state entry without creating one.
    pub async fn get(&self, conversation_id: &str) -> Option<Arc<Mutex<NegotiationState>>> {
        self.conversations.lock().await.get(conversation_id).cloned()
    }

    /// Drops the conversation entirely. Removing an unknown identifier is a
    /// no-op; a turn already in flight keeps its `Arc` and finishes against
    /// the detached state.
    pub async fn remove(&self, conversation_id: &str) {
        self.conversations.lock().await.remove(conversation_id);
    }

    pub async fn len(&self) -> usize {
        self.conversations.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::ConversationStore;

    #[tokio::test]
    async fn get_or_create_returns_the_same_entry_per_identifier() {
        let store = ConversationStore::new();

        let first = store.get_or_create("alpha").await;
        first.lock().await.observe_price(Decimal::new(500, 0));

        let second = store.get_or_create("alpha").await;
        assert_eq!(second.lock().await.initial_price, Some(Decimal::new(500, 0)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn identifiers_isolate_state() {
        let store = ConversationStore::new();

        store.get_or_create("alpha").await.lock().await.observe_price(Decimal::new(500, 0));
        let other = store.get_or_create("beta").await;

        assert!(other.lock().await.initial_price.is_none());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn remove_is_idempotent_and_resets_state() {
        let store = ConversationStore::new();

        store.remove("missing").await;
        assert!(store.is_empty().await);

        store.get_or_create("alpha").await.lock().await.observe_price(Decimal::new(500, 0));
        store.remove("alpha").await;
        store.remove("alpha").await;

        let fresh = store.get_or_create("alpha").await;
        assert!(fresh.lock().await.initial_price.is_none());
    }
}
