//! Editing Session
//!
//! `EditorSession` owns the campaign document being edited and exposes
//! every mutation the editing surface performs: entity CRUD keyed by
//! tracking key, rename with sanitization, import from file or URL,
//! export, and portrait processing. The session is single-owner; all
//! mutation goes through `&mut self`, so there is no interior locking.

use std::cell::Cell;
use std::path::Path;

use crate::config::{EditorConfig, LanguageSpec};
use crate::core::campaign::dependencies;
use crate::core::campaign::export;
use crate::core::campaign::identity::{allocate_stable_id, ensure_unique_id, sanitize_id, EntityKind};
use crate::core::campaign::migration::MigrationRegistry;
use crate::core::campaign::model::{
    Campaign, Character, CharacterId, Clue, ClueId, Conditional, TrackingKey,
};

use super::import::{self, ImportError, ImportReport};
use super::portrait;

/// Shown for character references whose id no longer resolves.
const UNKNOWN_CHARACTER_LABEL: &str = "Unknown Character";

// ============================================================================
// Import Guard
// ============================================================================

/// Holds the session's busy flag for the duration of one import. The flag
/// is released on drop, so an abandoned import future cannot leave the
/// session stuck busy.
struct ImportGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> ImportGuard<'a> {
    fn claim(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.get() {
            return None;
        }
        flag.set(true);
        Some(Self { flag })
    }
}

impl Drop for ImportGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

// ============================================================================
// Editor Session
// ============================================================================

/// The campaign document under edit, plus editor-side state that is not
/// part of the document: the language roster, the language selected for
/// localized text entry, and the import busy flag.
pub struct EditorSession {
    campaign: Campaign,
    migrations: MigrationRegistry,
    languages: Vec<LanguageSpec>,
    selected_language: String,
    is_importing: Cell<bool>,
}

impl EditorSession {
    /// Session over an empty document, with the default language roster.
    pub fn new() -> Self {
        Self::with_config(&EditorConfig::default())
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        let selected_language = config
            .languages
            .first()
            .map(|language| language.code.clone())
            .unwrap_or_else(|| "en".to_string());
        Self {
            campaign: Campaign::new(),
            migrations: MigrationRegistry::standard(),
            languages: config.languages.clone(),
            selected_language,
            is_importing: Cell::new(false),
        }
    }

    // ------------------------------------------------------------------
    // Document access
    // ------------------------------------------------------------------

    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    /// Mutable access for plain field edits (title, intro message, initial
    /// characters, entity form fields). Identity-sensitive changes go
    /// through the dedicated methods instead.
    pub fn campaign_mut(&mut self) -> &mut Campaign {
        &mut self.campaign
    }

    pub fn languages(&self) -> &[LanguageSpec] {
        &self.languages
    }

    pub fn selected_language(&self) -> &str {
        &self.selected_language
    }

    pub fn set_selected_language(&mut self, code: impl Into<String>) {
        self.selected_language = code.into();
    }

    pub fn is_importing(&self) -> bool {
        self.is_importing.get()
    }

    // ------------------------------------------------------------------
    // Entity CRUD
    // ------------------------------------------------------------------

    /// Add a blank character with a freshly allocated stable id and
    /// tracking key; returns the key.
    pub fn add_character(&mut self) -> TrackingKey {
        let id = allocate_stable_id(
            EntityKind::Character,
            self.campaign.characters.iter().map(|c| c.id.as_str()),
        );
        let character = Character::new(CharacterId::new(id));
        let key = character.key;
        log::debug!("Added character {}", character.id);
        self.campaign.characters.push(character);
        key
    }

    /// Add a blank clue with a freshly allocated stable id and tracking
    /// key; returns the key.
    pub fn add_clue(&mut self) -> TrackingKey {
        let id = allocate_stable_id(
            EntityKind::Clue,
            self.campaign.clues.iter().map(|c| c.id.as_str()),
        );
        let clue = Clue::new(ClueId::new(id));
        let key = clue.key;
        log::debug!("Added clue {}", clue.id);
        self.campaign.clues.push(clue);
        key
    }

    /// Add a blank conditional rule; returns its tracking key.
    pub fn add_conditional(&mut self) -> TrackingKey {
        let conditional = Conditional::new();
        let key = conditional.key;
        self.campaign.conditionals.push(conditional);
        key
    }

    pub fn character(&self, key: TrackingKey) -> Option<&Character> {
        self.campaign.character_by_key(key)
    }

    pub fn character_mut(&mut self, key: TrackingKey) -> Option<&mut Character> {
        self.campaign.character_by_key_mut(key)
    }

    pub fn clue(&self, key: TrackingKey) -> Option<&Clue> {
        self.campaign.clue_by_key(key)
    }

    pub fn clue_mut(&mut self, key: TrackingKey) -> Option<&mut Clue> {
        self.campaign.clue_by_key_mut(key)
    }

    pub fn conditional(&self, key: TrackingKey) -> Option<&Conditional> {
        self.campaign.conditional_by_key(key)
    }

    pub fn conditional_mut(&mut self, key: TrackingKey) -> Option<&mut Conditional> {
        self.campaign.conditional_by_key_mut(key)
    }

    /// Remove the character with tracking key `key`. Returns whether a
    /// character was removed. References to its id elsewhere are left
    /// dangling on purpose.
    pub fn remove_character(&mut self, key: TrackingKey) -> bool {
        match self.campaign.characters.iter().position(|c| c.key == key) {
            Some(index) => {
                let removed = self.campaign.characters.remove(index);
                log::debug!("Removed character {}", removed.id);
                true
            }
            None => false,
        }
    }

    /// Remove the clue with tracking key `key`.
    pub fn remove_clue(&mut self, key: TrackingKey) -> bool {
        match self.campaign.clues.iter().position(|c| c.key == key) {
            Some(index) => {
                let removed = self.campaign.clues.remove(index);
                log::debug!("Removed clue {}", removed.id);
                true
            }
            None => false,
        }
    }

    /// Remove the conditional with tracking key `key`.
    pub fn remove_conditional(&mut self, key: TrackingKey) -> bool {
        match self.campaign.conditionals.iter().position(|c| c.key == key) {
            Some(index) => {
                self.campaign.conditionals.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace the character at `key` with an edited copy, keeping the
    /// tracking key. Returns false if no character has that key.
    pub fn replace_character(&mut self, key: TrackingKey, mut character: Character) -> bool {
        match self.campaign.character_by_key_mut(key) {
            Some(existing) => {
                character.key = key;
                *existing = character;
                true
            }
            None => false,
        }
    }

    /// Replace the clue at `key` with an edited copy, keeping the key.
    pub fn replace_clue(&mut self, key: TrackingKey, mut clue: Clue) -> bool {
        match self.campaign.clue_by_key_mut(key) {
            Some(existing) => {
                clue.key = key;
                *existing = clue;
                true
            }
            None => false,
        }
    }

    /// Replace the conditional at `key` with an edited copy, keeping the
    /// key.
    pub fn replace_conditional(&mut self, key: TrackingKey, mut conditional: Conditional) -> bool {
        match self.campaign.conditional_by_key_mut(key) {
            Some(existing) => {
                conditional.key = key;
                *existing = conditional;
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Renames
    // ------------------------------------------------------------------

    /// Sanitize `raw` into slug form and assign it as the character's
    /// stable id. A collision with another character's id gets a numeric
    /// suffix, the same probing used at creation. Returns the id actually
    /// assigned, or None if no character has `key`.
    ///
    /// Conditionals referencing the old id are not rewritten; they dangle
    /// until the author updates them.
    pub fn rename_character(&mut self, key: TrackingKey, raw: &str) -> Option<CharacterId> {
        let old = self.campaign.character_by_key(key)?.id.clone();
        let sanitized = sanitize_id(raw);
        let others: Vec<String> = self
            .campaign
            .characters
            .iter()
            .filter(|c| c.key != key)
            .map(|c| c.id.as_str().to_string())
            .collect();
        let id = CharacterId::new(ensure_unique_id(
            &sanitized,
            others.iter().map(String::as_str),
        ));
        if let Some(character) = self.campaign.character_by_key_mut(key) {
            character.id = id.clone();
        }
        log::debug!("Renamed character {old} to {id}");
        Some(id)
    }

    /// Sanitize `raw` into slug form and assign it as the clue's stable
    /// id; collisions get a numeric suffix. Returns the id actually
    /// assigned, or None if no clue has `key`.
    pub fn rename_clue(&mut self, key: TrackingKey, raw: &str) -> Option<ClueId> {
        let old = self.campaign.clue_by_key(key)?.id.clone();
        let sanitized = sanitize_id(raw);
        let others: Vec<String> = self
            .campaign
            .clues
            .iter()
            .filter(|c| c.key != key)
            .map(|c| c.id.as_str().to_string())
            .collect();
        let id = ClueId::new(ensure_unique_id(
            &sanitized,
            others.iter().map(String::as_str),
        ));
        if let Some(clue) = self.campaign.clue_by_key_mut(key) {
            clue.id = id.clone();
        }
        log::debug!("Renamed clue {old} to {id}");
        Some(id)
    }

    // ------------------------------------------------------------------
    // Reference lookups and labels
    // ------------------------------------------------------------------

    /// Conditionals that unlock the entity with stable id `id`.
    pub fn dependents_of(&self, id: &str, kind: EntityKind) -> Vec<&Conditional> {
        dependencies::dependents_of(id, kind, &self.campaign.conditionals)
    }

    /// Display label for a character id: the character's name, falling
    /// back to the id for unnamed characters and to a placeholder for ids
    /// that no longer resolve.
    pub fn character_label(&self, id: &str) -> String {
        match self.campaign.character_by_id(id) {
            Some(character) if !character.name.is_empty() => character.name.clone(),
            Some(character) => character.id.to_string(),
            None => UNKNOWN_CHARACTER_LABEL.to_string(),
        }
    }

    /// Display label for a clue id: its text in the selected language,
    /// falling back to the id itself (also for ids that no longer
    /// resolve).
    pub fn clue_label(&self, id: &str) -> String {
        self.campaign
            .clue_by_id(id)
            .and_then(|clue| clue.text.get(&self.selected_language))
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }

    // ------------------------------------------------------------------
    // Import
    // ------------------------------------------------------------------

    /// Import a campaign from JSON text, replacing the current document.
    /// On any failure the current document is left untouched.
    pub fn import_from_json(&mut self, text: &str) -> import::Result<ImportReport> {
        let guard =
            ImportGuard::claim(&self.is_importing).ok_or(ImportError::ImportInProgress)?;
        let result = import::import_json(text, &self.migrations);
        drop(guard);
        let (campaign, report) = result?;
        self.commit_import(campaign, &report);
        Ok(report)
    }

    /// Import a campaign file from disk, replacing the current document on
    /// success. Refused while another import is in flight.
    pub async fn import_from_file(&mut self, path: impl AsRef<Path>) -> import::Result<ImportReport> {
        let guard =
            ImportGuard::claim(&self.is_importing).ok_or(ImportError::ImportInProgress)?;
        let result = import::import_file(path, &self.migrations).await;
        drop(guard);
        let (campaign, report) = result?;
        self.commit_import(campaign, &report);
        Ok(report)
    }

    /// Fetch and import a campaign from a URL, replacing the current
    /// document on success. Refused while another import is in flight.
    pub async fn import_from_url(&mut self, url: &str) -> import::Result<ImportReport> {
        let guard =
            ImportGuard::claim(&self.is_importing).ok_or(ImportError::ImportInProgress)?;
        let result = import::import_url(url, &self.migrations).await;
        drop(guard);
        let (campaign, report) = result?;
        self.commit_import(campaign, &report);
        Ok(report)
    }

    fn commit_import(&mut self, campaign: Campaign, report: &ImportReport) {
        log::info!("{}", report.summary());
        self.campaign = campaign;
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Deep copy of the document with tracking keys cleared.
    pub fn sanitized(&self) -> Campaign {
        export::sanitize(&self.campaign)
    }

    /// Sanitized document as pretty-printed JSON.
    pub fn export_pretty_json(&self) -> export::Result<String> {
        export::to_pretty_json(&self.campaign)
    }

    /// Write the sanitized document to `path`.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> export::Result<()> {
        export::write_to_file(&self.campaign, path)
    }

    // ------------------------------------------------------------------
    // Portraits
    // ------------------------------------------------------------------

    /// Process an uploaded image and store it as the portrait of the
    /// character at `key`. Returns Ok(false) if no character has that key;
    /// the image is not processed in that case.
    pub fn set_portrait(
        &mut self,
        key: TrackingKey,
        bytes: &[u8],
        content_type: &str,
    ) -> portrait::Result<bool> {
        if self.campaign.character_by_key(key).is_none() {
            return Ok(false);
        }
        let data_uri = portrait::process_portrait(bytes, content_type)?;
        if let Some(character) = self.campaign.character_by_key_mut(key) {
            character.portrait = data_uri;
        }
        Ok(true)
    }

    /// Clear the portrait of the character at `key`. Returns whether a
    /// character had that key.
    pub fn clear_portrait(&mut self, key: TrackingKey) -> bool {
        match self.campaign.character_by_key_mut(key) {
            Some(character) => {
                character.portrait.clear();
                true
            }
            None => false,
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
