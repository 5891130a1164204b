//! Keyword-driven fact extraction from free-text negotiation replies.
//!
//! Everything here is a pure function over `&str`. A pattern that does not
//! match leaves the corresponding field untouched; only the emotional
//! classification always resolves, falling back to friendly.

use rust_decimal::Decimal;

use crate::negotiation::{EmotionalState, NegotiationState};

const GRATITUDE_TERMS: &[&str] = &["thank you", "appreciate"];
const CONCERN_TERMS: &[&str] = &["concern", "budget"];
const HOPE_TERMS: &[&str] = &["hope", "would be great"];
const INTEREST_TERMS: &[&str] = &["interest", "love to"];

const ROOM_TYPE_TERMS: &[&str] = &["deluxe", "suite", "standard"];
const VIEW_CONTEXT_TERMS: &[&str] = &["view", "city", "garden", "pool"];
const VIEW_KIND_TERMS: &[&str] = &["city", "garden", "pool"];
const OCCUPANCY_CONTEXT_TERMS: &[&str] = &["occupancy", "guests", "people"];

const MEAL_TERMS: &[&str] = &["meal", "breakfast", "dinner"];
const WIFI_TERMS: &[&str] = &["wifi"];
const PARKING_TERMS: &[&str] = &["parking"];
const CASHBACK_TERMS: &[&str] = &["cashback", "credit card"];
const SPA_TERMS: &[&str] = &["spa", "massage"];
const AIRPORT_TRANSFER_TERMS: &[&str] = &["airport", "transfer"];
const LATE_CHECKOUT_TERMS: &[&str] = &["late checkout", "check-out"];
const ROOM_UPGRADE_TERMS: &[&str] = &["upgrade", "better room"];

const SUCCESS_TERMS: &[&str] = &["thank you", "appreciate", "great offer", "perfect"];

/// Extracts the first price-shaped token from a message.
///
/// Accepts a currency prefix (`₹`, `Rs`, `Rs.`, `INR`, any case) or a bare
/// amount; since the prefix is optional either way, matching reduces to the
/// first run of digits, with `,` thousands separators stripped and at most
/// one `.` fractional part kept.
pub fn extract_price(text: &str) -> Option<Decimal> {
    let bytes = text.as_bytes();
    let mut index = 0;

    while index < bytes.len() {
        if !bytes[index].is_ascii_digit() {
            index += 1;
            continue;
        }

        let mut token = String::new();
        let mut seen_fraction = false;
        while index < bytes.len() {
            let byte = bytes[index];
            if byte.is_ascii_digit() {
                token.push(char::from(byte));
            } else if byte == b',' && !seen_fraction && digit_follows(bytes, index + 1) {
                // thousands separator, stripped
            } else if byte == b'.' && !seen_fraction && digit_follows(bytes, index + 1) {
                seen_fraction = true;
                token.push('.');
            } else {
                break;
            }
            index += 1;
        }

        return token.parse().ok();
    }

    None
}

/// Folds a generated reply back into the negotiation state: emotional
/// classification, room facts, benefit flags, and success detection, in
/// that order.
pub fn apply_reply_signals(state: &mut NegotiationState, reply: &str) {
    if reply.is_empty() {
        return;
    }
    let normalized = reply.to_lowercase();

    state.emotional_state = classify_emotion(&normalized);

    if let Some(room_type) = earliest_term(&normalized, ROOM_TYPE_TERMS) {
        state.basic_details.room_type = Some(room_type.to_string());
    }
    if contains_any(&normalized, VIEW_CONTEXT_TERMS) {
        if let Some(view) = earliest_term(&normalized, VIEW_KIND_TERMS) {
            state.basic_details.view = Some(view.to_string());
        }
    }
    if contains_any(&normalized, OCCUPANCY_CONTEXT_TERMS) {
        if let Some(count) = first_integer(&normalized) {
            state.basic_details.occupancy = Some(count);
        }
    }

    let benefits = &mut state.requested_benefits;
    benefits.meals |= contains_any(&normalized, MEAL_TERMS);
    benefits.wifi |= contains_any(&normalized, WIFI_TERMS);
    benefits.parking |= contains_any(&normalized, PARKING_TERMS);
    benefits.cashback |= contains_any(&normalized, CASHBACK_TERMS);
    benefits.spa |= contains_any(&normalized, SPA_TERMS);
    benefits.airport_transfer |= contains_any(&normalized, AIRPORT_TRANSFER_TERMS);
    benefits.late_checkout |= contains_any(&normalized, LATE_CHECKOUT_TERMS);
    benefits.room_upgrade |= contains_any(&normalized, ROOM_UPGRADE_TERMS);

    if contains_any(&normalized, SUCCESS_TERMS) {
        state.negotiation_successful = true;
    }
}

/// First matching category wins; gratitude outranks concern outranks hope
/// outranks interest.
fn classify_emotion(normalized: &str) -> EmotionalState {
    if contains_any(normalized, GRATITUDE_TERMS) {
        EmotionalState::Appreciative
    } else if contains_any(normalized, CONCERN_TERMS) {
        EmotionalState::Concerned
    } else if contains_any(normalized, HOPE_TERMS) {
        EmotionalState::Hopeful
    } else if contains_any(normalized, INTEREST_TERMS) {
        EmotionalState::Interested
    } else {
        EmotionalState::Friendly
    }
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

/// Leftmost occurrence in the text wins, not position in the term list.
fn earliest_term(text: &str, terms: &[&'static str]) -> Option<&'static str> {
    terms
        .iter()
        .copied()
        .filter_map(|term| text.find(term).map(|position| (position, term)))
        .min_by_key(|(position, _)| *position)
        .map(|(_, term)| term)
}

fn first_integer(text: &str) -> Option<String> {
    let start = text.find(|ch: char| ch.is_ascii_digit())?;
    let digits = text[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>();
    Some(digits)
}

fn digit_follows(bytes: &[u8], index: usize) -> bool {
    bytes.get(index).is_some_and(|byte| byte.is_ascii_digit())
}
