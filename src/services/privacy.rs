//! Privacy preference flags.
//!
//! The flags are recorded and exported but gate no behaviour in the engine.
//! Changes are written through to the stored consent record when one exists.

use crate::models::{ConsentRecord, PrivacyFlag, PrivacySettings};
use crate::services::consent::ConsentStore;

#[derive(Debug, Default)]
pub struct PrivacyPolicy {
    settings: PrivacySettings,
}

impl PrivacyPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> PrivacySettings {
        self.settings
    }

    pub fn is_enabled(&self, flag: PrivacyFlag) -> bool {
        match flag {
            PrivacyFlag::Analytics => self.settings.analytics,
            PrivacyFlag::Recommendations => self.settings.recommendations,
            PrivacyFlag::Marketing => self.settings.marketing,
        }
    }

    /// Change one flag. Returns whether the change was persisted.
    ///
    /// Without a consent record the change stays in memory only.
    pub fn set_flag(&mut self, flag: PrivacyFlag, value: bool, consent: &ConsentStore) -> bool {
        match flag {
            PrivacyFlag::Analytics => self.settings.analytics = value,
            PrivacyFlag::Recommendations => self.settings.recommendations = value,
            PrivacyFlag::Marketing => self.settings.marketing = value,
        }

        let persisted = consent.merge_settings(self.settings.consent_settings());
        tracing::info!(%flag, value, persisted, "Privacy setting changed");
        persisted
    }

    pub fn apply_consent(&mut self, record: &ConsentRecord) {
        self.settings.apply(&record.settings);
    }

    pub fn reset(&mut self) {
        self.settings = PrivacySettings::default();
    }
}
