//! Reverse dependency lookup over conditional rules.

use super::identity::EntityKind;
use super::model::Conditional;

/// Conditionals that unlock the entity with stable id `id`, in the source
/// collection's order.
///
/// Recomputed from the live slice on every call, so the answer always
/// reflects the latest edits. Ids with no match, including references to
/// entities that no longer exist, yield an empty result rather than an
/// error.
pub fn dependents_of<'a>(
    id: &str,
    kind: EntityKind,
    conditionals: &'a [Conditional],
) -> Vec<&'a Conditional> {
    conditionals
        .iter()
        .filter(|conditional| match kind {
            EntityKind::Clue => conditional.unlocked_clues.iter().any(|c| c.as_str() == id),
            EntityKind::Character => conditional
                .unlocked_characters
                .iter()
                .any(|c| c.as_str() == id),
        })
        .collect()
}
