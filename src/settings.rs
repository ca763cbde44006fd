//! Countdown settings
//!
//! Persisted separately from the deadline under `hatch_settings`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::MS_PER_MINUTE;
use crate::persistence::{Storage, parse_int_prefix};

/// Fallback countdown length (minutes)
pub const DEFAULT_COUNTDOWN_MINUTES: u32 = 6;
/// Fallback code window length (minutes)
pub const DEFAULT_KEYPAD_MINUTES: u32 = 4;

/// Rejected settings edit. The message is shown to the operator verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Keypad window must be less than countdown time!")]
    KeypadNotShorter { countdown: u32, keypad: u32 },
    #[error("Times must be at least one minute!")]
    NonPositive,
    #[error("Countdown cannot exceed 999 minutes!")]
    TooLong,
}

/// Longest countdown the three minute tiles can show
pub const MAX_COUNTDOWN_MINUTES: u32 = 999;

/// Timer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Full run length
    pub countdown_minutes: u32,
    /// Length of the final stretch where the code may be entered
    pub keypad_minutes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            countdown_minutes: DEFAULT_COUNTDOWN_MINUTES,
            keypad_minutes: DEFAULT_KEYPAD_MINUTES,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "hatch_settings";

    /// Build validated settings
    pub fn new(countdown_minutes: u32, keypad_minutes: u32) -> Result<Self, SettingsError> {
        let settings = Self {
            countdown_minutes,
            keypad_minutes,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Check `0 < keypad < countdown <= 999`
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.countdown_minutes == 0 || self.keypad_minutes == 0 {
            return Err(SettingsError::NonPositive);
        }
        if self.countdown_minutes > MAX_COUNTDOWN_MINUTES {
            return Err(SettingsError::TooLong);
        }
        if self.keypad_minutes >= self.countdown_minutes {
            return Err(SettingsError::KeypadNotShorter {
                countdown: self.countdown_minutes,
                keypad: self.keypad_minutes,
            });
        }
        Ok(())
    }

    /// Parse the two admin form fields
    ///
    /// Non-numeric or zero fields fall back to the defaults; the combination is
    /// then validated.
    pub fn from_form(countdown: &str, keypad: &str) -> Result<Self, SettingsError> {
        let countdown = form_minutes(countdown, DEFAULT_COUNTDOWN_MINUTES)?;
        let keypad = form_minutes(keypad, DEFAULT_KEYPAD_MINUTES)?;
        Self::new(countdown, keypad)
    }

    /// Total run length in ms
    pub fn total_ms(&self) -> f64 {
        self.countdown_minutes as f64 * MS_PER_MINUTE
    }

    /// Code window length in ms
    pub fn code_window_ms(&self) -> f64 {
        self.keypad_minutes as f64 * MS_PER_MINUTE
    }

    /// Clock text a fresh run starts from, e.g. `"00600"` for six minutes
    pub fn initial_digits(&self) -> String {
        format!("{:03}00", self.countdown_minutes)
    }

    /// Load settings, falling back to defaults on missing or corrupt data
    pub fn load(storage: &dyn Storage) -> Self {
        if let Some(json) = storage.get_item(Self::STORAGE_KEY) {
            match serde_json::from_str::<Settings>(&json) {
                Ok(settings) if settings.validate().is_ok() => {
                    log::info!(
                        "Loaded settings: {} min countdown, {} min keypad",
                        settings.countdown_minutes,
                        settings.keypad_minutes
                    );
                    return settings;
                }
                Ok(settings) => {
                    log::warn!(
                        "Stored settings out of range ({:?}), using defaults",
                        settings
                    );
                }
                Err(e) => {
                    log::warn!("Stored settings unreadable ({}), using defaults", e);
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings (replaces the stored blob wholesale)
    pub fn save(&self, storage: &dyn Storage) {
        if let Ok(json) = serde_json::to_string(self) {
            if storage.set_item(Self::STORAGE_KEY, &json) {
                log::info!("Settings saved");
            } else {
                log::warn!("Settings could not be persisted");
            }
        }
    }
}

fn form_minutes(field: &str, fallback: u32) -> Result<u32, SettingsError> {
    match parse_int_prefix(field) {
        None | Some(0) => Ok(fallback),
        Some(n) if n < 0 => Err(SettingsError::NonPositive),
        Some(n) => Ok(u32::try_from(n).unwrap_or(u32::MAX)),
    }
}
