use std::fmt;
use std::str::FromStr;

use crate::error::{ChamberError, Result};
use crate::shapes::Formation;

/// Cognitive modes and conversation states the chamber can visualise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Idle,
    Thinking,
    Creative,
    Observing,
    Summon,
    Dialogue,
    Dissolve,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Idle,
        Mode::Thinking,
        Mode::Creative,
        Mode::Observing,
        Mode::Summon,
        Mode::Dialogue,
        Mode::Dissolve,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Thinking => "thinking",
            Mode::Creative => "creative",
            Mode::Observing => "observing",
            Mode::Summon => "summon",
            Mode::Dialogue => "dialogue",
            Mode::Dissolve => "dissolve",
        }
    }

    pub fn theme(self) -> &'static Theme {
        match self {
            Mode::Idle => &Theme::IDLE,
            Mode::Thinking => &Theme::THINKING,
            Mode::Creative => &Theme::CREATIVE,
            Mode::Observing => &Theme::OBSERVING,
            Mode::Summon => &Theme::SUMMON,
            Mode::Dialogue => &Theme::DIALOGUE,
            Mode::Dissolve => &Theme::DISSOLVE,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = ChamberError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        Mode::ALL
            .into_iter()
            .find(|m| m.name() == key)
            .ok_or_else(|| ChamberError::UnknownMode(s.to_string()))
    }
}

/// Visual preset for a mode: palette, energy baseline and formation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    /// Base hue in degrees.
    pub hue: f32,
    /// Saturation in percent.
    pub saturation: f32,
    /// Lightness in percent.
    pub lightness: f32,
    /// Energy level particles relax toward.
    pub energy: f32,
    pub formation: Formation,
}

impl Theme {
    pub const IDLE: Self = Self {
        hue: 195.0,
        saturation: 80.0,
        lightness: 60.0,
        energy: 0.35,
        formation: Formation::Scatter,
    };

    pub const THINKING: Self = Self {
        hue: 275.0,
        saturation: 85.0,
        lightness: 65.0,
        energy: 0.85,
        formation: Formation::Dna,
    };

    pub const CREATIVE: Self = Self {
        hue: 320.0,
        saturation: 90.0,
        lightness: 62.0,
        energy: 0.75,
        formation: Formation::Torus,
    };

    pub const OBSERVING: Self = Self {
        hue: 165.0,
        saturation: 70.0,
        lightness: 55.0,
        energy: 0.5,
        formation: Formation::Sphere,
    };

    pub const SUMMON: Self = Self {
        hue: 45.0,
        saturation: 95.0,
        lightness: 60.0,
        energy: 0.9,
        formation: Formation::Sphere,
    };

    pub const DIALOGUE: Self = Self {
        hue: 210.0,
        saturation: 85.0,
        lightness: 62.0,
        energy: 0.65,
        formation: Formation::Helix,
    };

    pub const DISSOLVE: Self = Self {
        hue: 220.0,
        saturation: 25.0,
        lightness: 50.0,
        energy: 0.2,
        formation: Formation::Scatter,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_themes_valid() {
        for mode in Mode::ALL {
            let theme = mode.theme();
            assert!((0.0..360.0).contains(&theme.hue), "{} hue out of range", mode);
            assert!(theme.energy > 0.0 && theme.energy <= 1.0, "{} energy must be in (0,1]", mode);
            assert!(theme.saturation >= 0.0 && theme.saturation <= 100.0);
        }
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(mode.name().parse::<Mode>().unwrap(), mode);
        }
        assert!(matches!("Creative ".parse::<Mode>(), Ok(Mode::Creative)));
        assert!(matches!("sleepy".parse::<Mode>(), Err(ChamberError::UnknownMode(_))));
    }
}
