// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Consent record and privacy preference models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::AppError;

/// Persisted record of the user's privacy choices.
///
/// A record only exists once essential consent was given; `essential` is
/// always `true` for records built by [`ConsentRecord::accept`], and stored
/// records where it is not are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    /// When consent was given (ISO 8601)
    pub timestamp: String,
    pub essential: bool,
    /// Analytics choice made in the consent dialog
    pub analytics: bool,
    pub settings: ConsentSettings,
}

/// The mutable part of the consent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentSettings {
    pub analytics: bool,
    pub recommendations: bool,
    pub marketing: bool,
}

impl ConsentRecord {
    /// Build the record for an "accept" in the consent dialog.
    ///
    /// Recommendations start enabled and marketing disabled.
    pub fn accept(essential: bool, analytics: bool, timestamp: String) -> Result<Self, AppError> {
        if !essential {
            return Err(AppError::BadRequest(
                "You must accept essential functionality to use this app.".to_string(),
            ));
        }

        Ok(Self {
            timestamp,
            essential: true,
            analytics,
            settings: ConsentSettings {
                analytics,
                recommendations: true,
                marketing: false,
            },
        })
    }

    pub fn is_valid(&self) -> bool {
        self.essential
    }
}

/// Current privacy preferences. `essential` cannot be switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PrivacySettings {
    pub essential: bool,
    pub analytics: bool,
    pub recommendations: bool,
    pub marketing: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            essential: true,
            analytics: true,
            recommendations: true,
            marketing: false,
        }
    }
}

impl PrivacySettings {
    pub fn consent_settings(&self) -> ConsentSettings {
        ConsentSettings {
            analytics: self.analytics,
            recommendations: self.recommendations,
            marketing: self.marketing,
        }
    }

    /// Overlay stored consent settings; `essential` stays on.
    pub fn apply(&mut self, settings: &ConsentSettings) {
        self.essential = true;
        self.analytics = settings.analytics;
        self.recommendations = settings.recommendations;
        self.marketing = settings.marketing;
    }
}

/// A user-adjustable privacy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivacyFlag {
    Analytics,
    Recommendations,
    Marketing,
}

impl FromStr for PrivacyFlag {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analytics" => Ok(PrivacyFlag::Analytics),
            "recommendations" => Ok(PrivacyFlag::Recommendations),
            "marketing" => Ok(PrivacyFlag::Marketing),
            "essential" => Err(AppError::BadRequest(
                "Essential functionality cannot be disabled".to_string(),
            )),
            other => Err(AppError::BadRequest(format!(
                "Unknown privacy setting: {other}"
            ))),
        }
    }
}

impl fmt::Display for PrivacyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrivacyFlag::Analytics => "analytics",
            PrivacyFlag::Recommendations => "recommendations",
            PrivacyFlag::Marketing => "marketing",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_requires_essential() {
        let err = ConsentRecord::accept(false, true, "2024-01-01T00:00:00.000Z".into());
        assert!(matches!(err, Err(AppError::BadRequest(_))));

        let record = ConsentRecord::accept(true, false, "2024-01-01T00:00:00.000Z".into())
            .expect("essential consent given");
        assert!(record.essential);
        assert!(!record.settings.analytics);
        assert!(record.settings.recommendations);
        assert!(!record.settings.marketing);
    }

    #[test]
    fn test_apply_keeps_essential() {
        let mut settings = PrivacySettings {
            essential: false,
            ..PrivacySettings::default()
        };
        settings.apply(&ConsentSettings {
            analytics: false,
            recommendations: false,
            marketing: true,
        });
        assert!(settings.essential);
        assert!(!settings.analytics);
        assert!(settings.marketing);
    }

    #[test]
    fn test_flag_parsing() {
        assert_eq!("Marketing".parse::<PrivacyFlag>().unwrap(), PrivacyFlag::Marketing);
        assert!("essential".parse::<PrivacyFlag>().is_err());
        assert!("telemetry".parse::<PrivacyFlag>().is_err());
        assert_eq!(PrivacyFlag::Analytics.to_string(), "analytics");
    }
}
