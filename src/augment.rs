//! # Component Augmentation
//!
//! Decides, per repository entry, whether required components are missing
//! and appends them.
//!
//! An entry is updated when all of the following hold:
//!
//! - it is eligible ([`RepositoryEntry::is_eligible`]): an active one-line
//!   entry with a non-flat suite, or an enabled deb822 stanza that declares
//!   both `Types` and `Components`;
//! - one of its URIs matches the configured mirror patterns;
//! - at least one required component is absent from its component tokens.
//!
//! Membership is token equality: `non-free-firmware` does not make
//! `non-free` present. Missing names are appended in the configured order,
//! after the existing list. Since an updated entry contains every required
//! name, running the augmenter again finds nothing to do.

use log::debug;

use crate::config::EngineConfig;
use crate::entry::{ListDocument, RepositoryEntry, StanzaDocument};

/// Applies the required component set to parsed documents.
#[derive(Debug, Clone, Copy)]
pub struct ComponentAugmenter<'a> {
    config: &'a EngineConfig,
}

impl<'a> ComponentAugmenter<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Whether any of the entry's URIs points at an official mirror.
    pub fn is_official<E: RepositoryEntry>(&self, entry: &E) -> bool {
        entry
            .uris()
            .iter()
            .any(|uri| self.config.mirrors().matches(uri))
    }

    /// Required components the entry lacks, in required order.
    pub fn missing<E: RepositoryEntry>(&self, entry: &E) -> Vec<&'a str> {
        let components: &'a _ = self.config.components();
        components.missing_from(entry.components())
    }

    pub fn needs_update<E: RepositoryEntry>(&self, entry: &E) -> bool {
        entry.is_eligible() && self.is_official(entry) && !self.missing(entry).is_empty()
    }

    /// Append the missing components. Returns whether the entry changed.
    pub fn apply<E: RepositoryEntry>(&self, entry: &mut E) -> bool {
        if !self.needs_update(entry) {
            return false;
        }
        let missing = self.missing(entry);
        debug!("appending components {:?} to {:?}", missing, entry.uris());
        entry.append_components(&missing);
        true
    }

    /// Augment every active entry of a one-line document.
    ///
    /// Returns the number of entries changed.
    pub fn augment_list(&self, doc: &mut ListDocument) -> usize {
        doc.entries_mut()
            .map(|entry| self.apply(entry))
            .filter(|changed| *changed)
            .count()
    }

    /// Augment every stanza of a deb822 document.
    ///
    /// Returns the number of stanzas changed.
    pub fn augment_stanzas(&self, doc: &mut StanzaDocument) -> usize {
        doc.stanzas_mut()
            .map(|stanza| self.apply(stanza))
            .filter(|changed| *changed)
            .count()
    }
}
