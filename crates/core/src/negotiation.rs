use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upper bound on retained conversation turns; the oldest turn is evicted first.
pub const MAX_TURN_HISTORY: usize = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationPhase {
    #[default]
    InitialContact,
    PriceNegotiation,
}

impl NegotiationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitialContact => "initial_contact",
            Self::PriceNegotiation => "price_negotiation",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalState {
    #[default]
    Friendly,
    Appreciative,
    Concerned,
    Hopeful,
    Interested,
}

impl EmotionalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Friendly => "friendly",
            Self::Appreciative => "appreciative",
            Self::Concerned => "concerned",
            Self::Hopeful => "hopeful",
            Self::Interested => "interested",
        }
    }
}

/// Perks the agent works toward once price talk settles. Flags only ever
/// flip to true; a benefit mentioned once stays requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitFlags {
    pub meals: bool,
    pub wifi: bool,
    pub parking: bool,
    pub cashback: bool,
    pub spa: bool,
    pub airport_transfer: bool,
    pub late_checkout: bool,
    pub room_upgrade: bool,
}

/// Room facts gathered along the way. Each field holds the latest mention,
/// overwritten rather than accumulated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicDetails {
    pub room_type: Option<String>,
    pub view: Option<String>,
    pub occupancy: Option<String>,
}

/// One exchanged pair: what the hotel staff said and what the agent answered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub hotel_staff: String,
    pub agent_reply: String,
}

/// Full negotiation record for one conversation identifier.
///
/// Lives in memory for the process lifetime; created lazily on first
/// contact and dropped only by an explicit clear.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationState {
    pub turns: Vec<Turn>,
    pub initial_price: Option<Decimal>,
    pub last_offered_price: Option<Decimal>,
    /// Tracked in the state shape and rendered into the prompt snapshot,
    /// but nothing increments it yet.
    pub negotiation_attempts: u32,
    pub phase: NegotiationPhase,
    pub requested_benefits: BenefitFlags,
    pub negotiation_successful: bool,
    /// Same situation as `negotiation_attempts`: snapshot-only.
    pub price_negotiation_complete: bool,
    pub basic_details: BasicDetails,
    pub emotional_state: EmotionalState,
}

impl NegotiationState {
    pub fn is_first_contact(&self) -> bool {
        self.turns.is_empty()
    }

    /// Registers a price seen in an inbound staff message.
    ///
    /// The transition is one-shot: the first detected price fixes
    /// `initial_price`, seeds `last_offered_price`, and advances the phase
    /// to price negotiation. Later prices change nothing and the phase
    /// never regresses. Returns whether the transition fired.
    pub fn observe_price(&mut self, price: Decimal) -> bool {
        if self.initial_price.is_some() {
            return false;
        }

        self.initial_price = Some(price);
        self.last_offered_price = Some(price);
        self.phase = NegotiationPhase::PriceNegotiation;
        true
    }

    /// Appends a completed turn, evicting the oldest entry once the history
    /// exceeds [`MAX_TURN_HISTORY`]. One eviction per turn keeps the
    /// invariant because appends happen one at a time.
    pub fn push_turn(&mut self, hotel_staff: impl Into<String>, agent_reply: impl Into<String>) {
        self.turns.push(Turn {
            hotel_staff: hotel_staff.into(),
            agent_reply: agent_reply.into(),
        });
        if self.turns.len() > MAX_TURN_HISTORY {
            self.turns.remove(0);
        }
    }
}
