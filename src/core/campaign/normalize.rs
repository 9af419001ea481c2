//! Import Normalization
//!
//! Typed parsing already fills absent fields with zero values (every model
//! field carries a serde default), so by the time a document is a
//! [`Campaign`] its shape is fixed. What parsing cannot do is assign list
//! identity: tracking keys are skipped by serde and deserialize as nil.
//! [`normalize`] finishes the job by giving every entity a fresh key.

use super::model::{Campaign, TrackingKey};

/// Assign a fresh tracking key to every entity, replacing any existing
/// assignment. Keys are session-local, so reassigning them is always safe;
/// running this twice just produces another valid keying.
pub fn normalize(mut campaign: Campaign) -> Campaign {
    for character in &mut campaign.characters {
        character.key = TrackingKey::new();
    }
    for clue in &mut campaign.clues {
        clue.key = TrackingKey::new();
    }
    for conditional in &mut campaign.conditionals {
        conditional.key = TrackingKey::new();
    }
    campaign
}

// ============================================================================
// Tests
// ============================================================================
