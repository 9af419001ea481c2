//! Stable-id allocation and sanitization.
//!
//! Stable ids are the slugs conditionals reference entities by. They are
//! unique within their collection at creation time; tracking keys, not ids,
//! carry list identity, so a later manual edit colliding two ids corrupts
//! references but never the editor's own bookkeeping.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::TrackingKey;

/// Characters allowed in a slug id; everything else is replaced.
static NON_SLUG_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^a-z0-9_]").expect("Failed to compile slug character regex"));

/// Entity kinds that carry user-facing stable ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Character,
    Clue,
}

impl EntityKind {
    /// Base slug new ids of this kind are derived from.
    pub fn base_slug(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Clue => "clue",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_slug())
    }
}

/// Returns `base` if it is not in `existing`, otherwise the first free
/// `base_1`, `base_2`, … candidate. Deterministic for a given collection.
pub fn ensure_unique_id<'a>(base: &str, existing: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = existing.into_iter().collect();
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut counter = 1usize;
    loop {
        let candidate = format!("{base}_{counter}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        counter += 1;
    }
}

/// Allocates a fresh stable id for a new entity of `kind`, probing the live
/// collection's ids so creation-time uniqueness always holds.
pub fn allocate_stable_id<'a>(
    kind: EntityKind,
    existing: impl IntoIterator<Item = &'a str>,
) -> String {
    ensure_unique_id(kind.base_slug(), existing)
}

/// Fresh list-identity key. Uniqueness comes from 122 bits of randomness;
/// no collection check is needed.
pub fn allocate_tracking_key() -> TrackingKey {
    TrackingKey::new()
}

/// Lower-cases `raw` and replaces every character outside `[a-z0-9_]` with
/// an underscore, one replacement per character, no run collapsing. Pure;
/// does not guarantee uniqueness against any collection, so callers that
/// assign the result re-check for collisions.
pub fn sanitize_id(raw: &str) -> String {
    NON_SLUG_CHAR
        .replace_all(&raw.to_lowercase(), "_")
        .into_owned()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_allocate_on_empty_collection_uses_base_slug() {
        let none = std::iter::empty::<&str>();
        assert_eq!(allocate_stable_id(EntityKind::Character, none), "character");
        let none = std::iter::empty::<&str>();
        assert_eq!(allocate_stable_id(EntityKind::Clue, none), "clue");
    }

    #[test]
    fn test_allocate_probes_past_taken_ids() {
        let existing = ["character", "character_1"];
        assert_eq!(
            allocate_stable_id(EntityKind::Character, existing),
            "character_2"
        );
    }

    #[test]
    fn test_allocate_ignores_gaps_above_the_first_free_slot() {
        // character_1 is free even though character_2 is taken.
        let existing = ["character", "character_2"];
        assert_eq!(
            allocate_stable_id(EntityKind::Character, existing),
            "character_1"
        );
    }

    #[test]
    fn test_allocate_ignores_other_kinds() {
        let existing = ["clue", "clue_1"];
        assert_eq!(allocate_stable_id(EntityKind::Character, existing), "character");
    }

    #[test]
    fn test_ensure_unique_id_returns_free_base_unchanged() {
        assert_eq!(ensure_unique_id("butler", ["maid", "cook"]), "butler");
    }

    #[rstest]
    #[case("Mr. Boddy!", "mr__boddy_")]
    #[case("Déjà Vu!", "d_j__vu_")]
    #[case("butler", "butler")]
    #[case("UPPER_case_09", "upper_case_09")]
    #[case("a b", "a_b")]
    #[case("", "")]
    fn test_sanitize_id(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(sanitize_id(raw), expected);
    }

    #[test]
    fn test_sanitize_replaces_per_character_without_collapsing() {
        // Three consecutive rejected characters become three underscores.
        assert_eq!(sanitize_id("a - b"), "a___b");
    }

    #[test]
    fn test_allocated_tracking_keys_are_assigned_and_distinct() {
        let a = allocate_tracking_key();
        let b = allocate_tracking_key();
        assert!(a.is_assigned());
        assert!(b.is_assigned());
        assert_ne!(a, b);
    }
}
