//! Data-driven synergy weights
//!
//! Weights and thresholds for the synergy scorer live in
//! `assets/config/synergy.ron` so balance tweaks after a game patch do not
//! need a rebuild.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SYNERGY_CONFIG_PATH: &str = "assets/config/synergy.ron";

/// Points each signal contributes at full strength. Must sum to 100.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SynergyWeights {
    pub roster_fill: f32,
    pub class_diversity: f32,
    pub role_coverage: f32,
    pub faction_overlap: f32,
    pub overdrive_saturation: f32,
}

impl SynergyWeights {
    pub fn total(&self) -> f32 {
        self.roster_fill
            + self.class_diversity
            + self.role_coverage
            + self.faction_overlap
            + self.overdrive_saturation
    }
}

impl Default for SynergyWeights {
    fn default() -> Self {
        Self {
            roster_fill: 15.0,
            class_diversity: 25.0,
            role_coverage: 20.0,
            faction_overlap: 25.0,
            overdrive_saturation: 15.0,
        }
    }
}

#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SynergyConfig {
    pub weights: SynergyWeights,
    /// Distinct classes at which diversity is considered full
    pub ideal_classes: usize,
    /// Overdrive users at which saturation peaks
    pub ideal_overdrive: usize,
    /// Signals below this strength produce a recommendation
    pub weak_signal_threshold: f32,
}

impl Default for SynergyConfig {
    fn default() -> Self {
        Self {
            weights: SynergyWeights::default(),
            ideal_classes: 4,
            ideal_overdrive: 3,
            weak_signal_threshold: 0.6,
        }
    }
}

impl SynergyConfig {
    pub fn validate(&self) -> Result<(), String> {
        let total = self.weights.total();
        if (total - 100.0).abs() > 0.01 {
            return Err(format!("synergy weights must sum to 100, got {}", total));
        }
        if self.ideal_classes == 0 || self.ideal_overdrive == 0 {
            return Err("ideal_classes and ideal_overdrive must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.weak_signal_threshold) {
            return Err(format!(
                "weak_signal_threshold must be within 0..=1, got {}",
                self.weak_signal_threshold
            ));
        }
        Ok(())
    }

    pub fn from_ron(contents: &str) -> Result<Self, String> {
        let config: SynergyConfig =
            ron::from_str(contents).map_err(|e| format!("Failed to parse synergy config: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}

/// Load the synergy config. A missing file falls back to the defaults.
pub fn load_synergy_config(path: &Path) -> Result<SynergyConfig, String> {
    if !path.exists() {
        warn!("{} not found, using default synergy weights", path.display());
        return Ok(SynergyConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let config = SynergyConfig::from_ron(&contents)?;

    info!("Loaded synergy weights from {}", path.display());
    Ok(config)
}

/// Bevy plugin that loads synergy weights at startup
pub struct SynergyConfigPlugin;

impl Plugin for SynergyConfigPlugin {
    fn build(&self, app: &mut App) {
        match load_synergy_config(Path::new(SYNERGY_CONFIG_PATH)) {
            Ok(config) => {
                app.insert_resource(config);
            }
            Err(e) => {
                // A broken config file is a packaging error; refuse to start
                panic!("Failed to load synergy config: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SynergyConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_weights_must_sum_to_100() {
        let mut config = SynergyConfig::default();
        config.weights.roster_fill = 30.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shipped_config_parses() {
        let contents = include_str!("../../assets/config/synergy.ron");
        let config = SynergyConfig::from_ron(contents).unwrap();
        assert_eq!(config, SynergyConfig::default());
    }
}
