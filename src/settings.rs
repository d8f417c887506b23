//! Visitor preferences
//!
//! Read from LocalStorage, where the site stores them; native builds always
//! use defaults.

use serde::{Deserialize, Serialize};

/// Page enhancer preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Plinko ===
    /// Run the ball-drop animation at all
    pub plinko: bool,
    /// Fixed RNG seed (None = seed from the clock)
    pub seed: Option<u64>,

    // === Accessibility ===
    /// Reduced motion (no ball drop, no icon spin)
    pub reduced_motion: bool,

    // === Rewards calculator ===
    /// Stake shown when the page loads
    pub default_stake: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            plinko: true,
            seed: None,
            reduced_motion: false,
            default_stake: crate::rewards::DEFAULT_STAKE,
        }
    }
}

impl Settings {
    /// Plinko runs unless disabled or reduced motion is requested
    pub fn plinko_enabled(&self) -> bool {
        self.plinko && !self.reduced_motion
    }

    /// Icon spin respects reduced motion
    pub fn spin_enabled(&self) -> bool {
        !self.reduced_motion
    }

    /// Seed to use, falling back to `clock_seed`
    pub fn seed_or(&self, clock_seed: u64) -> u64 {
        self.seed.unwrap_or(clock_seed)
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "data_plinko_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Discarding unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No {} on native, using defaults", Self::STORAGE_KEY);
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_disables_plinko() {
        let mut settings = Settings::default();
        assert!(settings.plinko_enabled());
        settings.reduced_motion = true;
        assert!(!settings.plinko_enabled());
        assert!(!settings.spin_enabled());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "seed": 9 }"#).unwrap();
        assert_eq!(settings.seed_or(1), 9);
        assert!(settings.plinko);
        assert_eq!(settings.default_stake, crate::rewards::DEFAULT_STAKE);
    }

    #[test]
    fn test_round_trip_json() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
