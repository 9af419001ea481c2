//! Campaign document model.
//!
//! `Campaign` is both the persisted wire schema and the in-memory editable
//! document. Every field carries a serde default, so absent fields become
//! their zero values at the deserialization boundary and a loaded document
//! always has every collection present. Tracking keys are `#[serde(skip)]`
//! and have no `Serialize` impl at all, so they cannot reach an exported
//! file.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Schema version written by this editor.
pub const CURRENT_VERSION: u32 = 1;

// ============================================================================
// Identity Types
// ============================================================================

macro_rules! define_slug_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_slug_id!(
    CharacterId,
    "Stable character id: a human-chosen slug, unique within `characters`."
);
define_slug_id!(
    ClueId,
    "Stable clue id: a human-chosen slug, unique within `clues`."
);

/// Ephemeral list-identity key.
///
/// Assigned once per in-memory entity instance (at creation, or at import
/// normalization) from 122 bits of randomness, so no uniqueness check is
/// needed. The nil value means "not yet assigned". Never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackingKey(Uuid);

impl TrackingKey {
    /// Fresh random key.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The unassigned key.
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_assigned(&self) -> bool {
        !self.0.is_nil()
    }
}

impl Default for TrackingKey {
    fn default() -> Self {
        Self::nil()
    }
}

impl fmt::Display for TrackingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Localized Text
// ============================================================================

/// Text localized by language code ("en", "es", …).
///
/// An absent language simply means untranslated. Insertion order is
/// preserved so an imported document serializes back in its original shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(IndexMap<String, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set one language's text.
    pub fn with(mut self, lang: impl Into<String>, text: impl Into<String>) -> Self {
        self.set(lang, text);
        self
    }

    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0.get(lang).map(String::as_str)
    }

    pub fn set(&mut self, lang: impl Into<String>, text: impl Into<String>) {
        self.0.insert(lang.into(), text.into());
    }

    pub fn remove(&mut self, lang: &str) -> Option<String> {
        self.0.shift_remove(lang)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A character in the campaign's cast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub intro: LocalizedText,
    pub description: LocalizedText,
    /// Prompt handed to an external art generator.
    pub portrait_prompt: String,
    /// Inline `data:` URI produced by portrait processing; empty when unset.
    pub portrait: String,
    /// Legacy wire flag; the document-level `initial_characters` list is
    /// authoritative for which characters start unlocked.
    pub is_initially_available: bool,
    /// In-session list identity; never serialized.
    #[serde(skip)]
    pub key: TrackingKey,
}

impl Character {
    /// Blank character with an assigned tracking key.
    pub fn new(id: CharacterId) -> Self {
        Self {
            id,
            key: TrackingKey::new(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_intro(mut self, intro: LocalizedText) -> Self {
        self.intro = intro;
        self
    }

    pub fn with_description(mut self, description: LocalizedText) -> Self {
        self.description = description;
        self
    }

    pub fn with_portrait_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.portrait_prompt = prompt.into();
        self
    }

    pub fn has_portrait(&self) -> bool {
        !self.portrait.is_empty()
    }
}

/// A clue the player can uncover.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Clue {
    pub id: ClueId,
    pub text: LocalizedText,
    pub description: LocalizedText,
    /// In-session list identity; never serialized.
    #[serde(skip)]
    pub key: TrackingKey,
}

impl Clue {
    /// Blank clue with an assigned tracking key.
    pub fn new(id: ClueId) -> Self {
        Self {
            id,
            key: TrackingKey::new(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: LocalizedText) -> Self {
        self.text = text;
        self
    }

    pub fn with_description(mut self, description: LocalizedText) -> Self {
        self.description = description;
        self
    }
}

/// An unlock rule: once every prerequisite is met while interacting with
/// `character_id`, the rule fires and grants its unlocks.
///
/// All references here are by id value, not ownership. Deleting the
/// referenced entity leaves the rule dangling, which the editor tolerates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Conditional {
    /// Character the player must be interacting with.
    pub character_id: CharacterId,
    /// Clues that must all be known before the rule can fire.
    pub required_clues: Vec<ClueId>,
    /// Characters that must all have been met before the rule can fire.
    pub required_characters: Vec<CharacterId>,
    /// Free-text description of the trigger.
    pub condition: String,
    pub revealed_information: String,
    /// Clues granted when the rule fires.
    pub unlocked_clues: Vec<ClueId>,
    /// Characters made available when the rule fires.
    pub unlocked_characters: Vec<CharacterId>,
    /// In-session list identity; never serialized.
    #[serde(skip)]
    pub key: TrackingKey,
}

impl Conditional {
    /// Blank rule with an assigned tracking key.
    pub fn new() -> Self {
        Self {
            key: TrackingKey::new(),
            ..Self::default()
        }
    }

    pub fn with_character(mut self, id: impl Into<CharacterId>) -> Self {
        self.character_id = id.into();
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn with_revealed_information(mut self, text: impl Into<String>) -> Self {
        self.revealed_information = text.into();
        self
    }

    pub fn with_required_clue(mut self, id: impl Into<ClueId>) -> Self {
        self.required_clues.push(id.into());
        self
    }

    pub fn with_required_character(mut self, id: impl Into<CharacterId>) -> Self {
        self.required_characters.push(id.into());
        self
    }

    pub fn with_unlocked_clue(mut self, id: impl Into<ClueId>) -> Self {
        self.unlocked_clues.push(id.into());
        self
    }

    pub fn with_unlocked_character(mut self, id: impl Into<CharacterId>) -> Self {
        self.unlocked_characters.push(id.into());
        self
    }
}

// ============================================================================
// Document Root
// ============================================================================

/// The campaign-definition document.
///
/// Field order matches the persisted JSON schema. After a document passes
/// through migration and normalization, `version` equals
/// [`CURRENT_VERSION`] and every collection is present, even if empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Campaign {
    pub version: u32,
    pub title: LocalizedText,
    pub intro_message: LocalizedText,
    pub characters: Vec<Character>,
    pub clues: Vec<Clue>,
    pub conditionals: Vec<Conditional>,
    /// Ids of characters available at campaign start.
    pub initial_characters: Vec<CharacterId>,
}

impl Default for Campaign {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            title: LocalizedText::new(),
            intro_message: LocalizedText::new(),
            characters: Vec::new(),
            clues: Vec::new(),
            conditionals: Vec::new(),
            initial_characters: Vec::new(),
        }
    }
}

impl Campaign {
    /// Empty, well-formed document at the current schema version.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn character_by_key(&self, key: TrackingKey) -> Option<&Character> {
        self.characters.iter().find(|c| c.key == key)
    }

    pub fn character_by_key_mut(&mut self, key: TrackingKey) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.key == key)
    }

    pub fn character_by_id(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id.as_str() == id)
    }

    pub fn clue_by_key(&self, key: TrackingKey) -> Option<&Clue> {
        self.clues.iter().find(|c| c.key == key)
    }

    pub fn clue_by_key_mut(&mut self, key: TrackingKey) -> Option<&mut Clue> {
        self.clues.iter_mut().find(|c| c.key == key)
    }

    pub fn clue_by_id(&self, id: &str) -> Option<&Clue> {
        self.clues.iter().find(|c| c.id.as_str() == id)
    }

    pub fn conditional_by_key(&self, key: TrackingKey) -> Option<&Conditional> {
        self.conditionals.iter().find(|c| c.key == key)
    }

    pub fn conditional_by_key_mut(&mut self, key: TrackingKey) -> Option<&mut Conditional> {
        self.conditionals.iter_mut().find(|c| c.key == key)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_key_defaults_to_nil() {
        let key = TrackingKey::default();
        assert!(!key.is_assigned());
        assert_eq!(key, TrackingKey::nil());
    }

    #[test]
    fn test_tracking_keys_are_distinct() {
        let a = TrackingKey::new();
        let b = TrackingKey::new();
        assert!(a.is_assigned());
        assert_ne!(a, b);
    }

    #[test]
    fn test_campaign_default_is_well_formed() {
        let campaign = Campaign::default();
        assert_eq!(campaign.version, CURRENT_VERSION);
        assert!(campaign.characters.is_empty());
        assert!(campaign.clues.is_empty());
        assert!(campaign.conditionals.is_empty());
        assert!(campaign.initial_characters.is_empty());
    }

    #[test]
    fn test_entity_constructors_assign_keys() {
        let character = Character::new(CharacterId::new("character"));
        let clue = Clue::new(ClueId::new("clue"));
        let conditional = Conditional::new();
        assert!(character.key.is_assigned());
        assert!(clue.key.is_assigned());
        assert!(conditional.key.is_assigned());
    }

    #[test]
    fn test_wire_schema_uses_camel_case() {
        let campaign = Campaign {
            intro_message: LocalizedText::new().with("en", "Welcome"),
            initial_characters: vec![CharacterId::new("butler")],
            ..Campaign::default()
        };
        let json = serde_json::to_value(&campaign).unwrap();
        assert_eq!(json["introMessage"]["en"], "Welcome");
        assert_eq!(json["initialCharacters"][0], "butler");
        assert_eq!(json["version"], 1);
    }

    #[test]
    fn test_tracking_key_never_serialized() {
        let mut campaign = Campaign::default();
        campaign.characters.push(Character::new(CharacterId::new("butler")));
        campaign.clues.push(Clue::new(ClueId::new("knife")));
        campaign.conditionals.push(Conditional::new());

        let json = serde_json::to_string(&campaign).unwrap();
        assert!(!json.contains("key"));
        assert!(!json.contains("_key"));
    }

    #[test]
    fn test_character_wire_fields() {
        let character = Character::new(CharacterId::new("butler"))
            .with_name("The Butler")
            .with_portrait_prompt("stern victorian butler");
        let json = serde_json::to_value(&character).unwrap();
        assert_eq!(json["id"], "butler");
        assert_eq!(json["portraitPrompt"], "stern victorian butler");
        assert_eq!(json["isInitiallyAvailable"], false);
        assert_eq!(json["portrait"], "");
    }

    #[test]
    fn test_conditional_wire_fields() {
        let conditional = Conditional::new()
            .with_character("butler")
            .with_required_clue("knife")
            .with_unlocked_clue("alibi")
            .with_unlocked_character("maid");
        let json = serde_json::to_value(&conditional).unwrap();
        assert_eq!(json["characterId"], "butler");
        assert_eq!(json["requiredClues"][0], "knife");
        assert_eq!(json["unlockedClues"][0], "alibi");
        assert_eq!(json["unlockedCharacters"][0], "maid");
    }

    #[test]
    fn test_missing_fields_become_zero_values() {
        let campaign: Campaign = serde_json::from_str(r#"{"version": 1}"#).unwrap();
        assert!(campaign.title.is_empty());
        assert!(campaign.intro_message.is_empty());
        assert!(campaign.characters.is_empty());
        assert!(campaign.clues.is_empty());
        assert!(campaign.conditionals.is_empty());
        assert!(campaign.initial_characters.is_empty());
    }

    #[test]
    fn test_deserialized_entities_have_unassigned_keys() {
        let campaign: Campaign = serde_json::from_str(
            r#"{"version": 1, "characters": [{"id": "butler"}], "clues": [{"id": "knife"}]}"#,
        )
        .unwrap();
        assert!(!campaign.characters[0].key.is_assigned());
        assert!(!campaign.clues[0].key.is_assigned());
    }

    #[test]
    fn test_localized_text_preserves_insertion_order() {
        let text = LocalizedText::new().with("es", "Hola").with("en", "Hello");
        let langs: Vec<&str> = text.languages().collect();
        assert_eq!(langs, vec!["es", "en"]);
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, r#"{"es":"Hola","en":"Hello"}"#);
    }

    #[test]
    fn test_lookup_by_key_and_id() {
        let mut campaign = Campaign::default();
        let character = Character::new(CharacterId::new("butler"));
        let key = character.key;
        campaign.characters.push(character);

        assert!(campaign.character_by_key(key).is_some());
        assert!(campaign.character_by_id("butler").is_some());
        assert!(campaign.character_by_key(TrackingKey::new()).is_none());
        assert!(campaign.character_by_id("ghost").is_none());
    }
}
