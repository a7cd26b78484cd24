//! Physics tuning and presets
//!
//! Persisted separately from replays in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Tuning preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TuningPreset {
    Gentle,
    #[default]
    Standard,
    Lively,
}

impl TuningPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TuningPreset::Gentle => "Gentle",
            TuningPreset::Standard => "Standard",
            TuningPreset::Lively => "Lively",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gentle" | "soft" => Some(TuningPreset::Gentle),
            "standard" | "std" => Some(TuningPreset::Standard),
            "lively" => Some(TuningPreset::Lively),
            _ => None,
        }
    }

    /// Gravity in px/s²
    pub fn gravity(&self) -> f32 {
        match self {
            TuningPreset::Gentle => 1100.0,
            TuningPreset::Standard => 1400.0,
            TuningPreset::Lively => 1700.0,
        }
    }

    /// Fraction of normal speed kept after a peg bounce
    pub fn peg_restitution(&self) -> f32 {
        match self {
            TuningPreset::Gentle => 0.45,
            TuningPreset::Standard => 0.55,
            TuningPreset::Lively => 0.65,
        }
    }

    /// Angular perturbation applied on a registered peg hit (radians)
    pub fn bounce_randomness(&self) -> f32 {
        match self {
            TuningPreset::Gentle => 0.15,
            TuningPreset::Standard => 0.25,
            TuningPreset::Lively => 0.4,
        }
    }
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimSettings {
    /// Preset the values were derived from
    pub preset: TuningPreset,

    // === Integration ===
    /// Ticks per simulated second
    pub tick_rate: u32,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Ball speed cap (px/s)
    pub max_speed: f32,

    // === Contacts ===
    pub peg_restitution: f32,
    /// Fraction of tangential speed kept after a peg bounce
    pub peg_friction: f32,
    pub wall_restitution: f32,
    pub floor_restitution: f32,
    /// Per-tick horizontal damping while resting on a bucket floor
    pub floor_friction: f32,
    /// Vertical speed below which a floor contact counts as resting (px/s)
    pub rest_speed: f32,
    pub bounce_randomness: f32,

    // === Outcome steering ===
    /// Peak lateral guidance acceleration inside the peg field (px/s²)
    pub guidance_accel: f32,
    /// How strongly bounce perturbations lean toward the target slot (0-1)
    pub bounce_bias: f32,
    /// Reseed attempts before giving up on the target slot
    pub steering_attempts: u32,

    // === Budgets ===
    /// Tick budget for one attempt
    pub max_ticks: u32,
    /// Longest motion trail the render cache will emit
    pub max_trail_length: u16,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self::from_preset(TuningPreset::Standard)
    }
}

impl SimSettings {
    /// Create settings from a tuning preset (applies preset defaults)
    pub fn from_preset(preset: TuningPreset) -> Self {
        Self {
            preset,

            tick_rate: SIM_TICK_RATE,
            gravity: preset.gravity(),
            max_speed: 900.0,

            peg_restitution: preset.peg_restitution(),
            peg_friction: 0.92,
            wall_restitution: 0.6,
            floor_restitution: 0.3,
            floor_friction: 0.8,
            rest_speed: 40.0,
            bounce_randomness: preset.bounce_randomness(),

            guidance_accel: 420.0,
            bounce_bias: 0.6,
            steering_attempts: 16,

            // One minute of simulated time
            max_ticks: SIM_TICK_RATE * 60,
            max_trail_length: 12,
        }
    }

    /// Fixed timestep derived from the tick rate
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Parse settings from JSON; missing fields take Standard defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject values the simulator cannot integrate sensibly
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_rate == 0 {
            return Err(invalid("tickRate", "must be at least 1"));
        }
        positive("gravity", self.gravity)?;
        positive("maxSpeed", self.max_speed)?;
        unit("pegRestitution", self.peg_restitution)?;
        unit("pegFriction", self.peg_friction)?;
        unit("wallRestitution", self.wall_restitution)?;
        unit("floorRestitution", self.floor_restitution)?;
        unit("floorFriction", self.floor_friction)?;
        unit("bounceBias", self.bounce_bias)?;
        positive("restSpeed", self.rest_speed)?;
        if !self.guidance_accel.is_finite() || self.guidance_accel < 0.0 {
            return Err(invalid("guidanceAccel", "must be finite and non-negative"));
        }
        if !(BOUNCE_RANDOMNESS_MIN..=BOUNCE_RANDOMNESS_MAX).contains(&self.bounce_randomness) {
            return Err(invalid(
                "bounceRandomness",
                format!("must lie in [{BOUNCE_RANDOMNESS_MIN}, {BOUNCE_RANDOMNESS_MAX}]"),
            ));
        }
        if self.steering_attempts == 0 {
            return Err(invalid("steeringAttempts", "must be at least 1"));
        }
        if self.max_ticks == 0 {
            return Err(invalid("maxTicks", "must be at least 1"));
        }
        if self.max_trail_length > TRAIL_LENGTH_LIMIT {
            return Err(invalid(
                "maxTrailLength",
                format!("must not exceed {TRAIL_LENGTH_LIMIT}"),
            ));
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "plinko_drop_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded {} settings from LocalStorage", settings.preset.as_str());
                        return settings;
                    }
                    Err(err) => log::warn!("Ignoring stored settings: {err}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive and finite, got {value}")))
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must lie in [0, 1], got {value}")))
    }
}
