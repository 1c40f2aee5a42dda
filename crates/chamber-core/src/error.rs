//! Error types for the chamber.
//!
//! Nothing here is fatal to the host: the public control surface of
//! [`HolographicChamber`](crate::chamber::HolographicChamber) logs these and
//! falls back to a safe formation.

use std::fmt;

#[derive(Debug)]
pub enum ChamberError {
    /// Canvas width or height is zero, negative or not finite.
    InvalidDimensions { width: f32, height: f32 },
    /// A chamber or formation was requested with no particles.
    EmptyParticleSet,
    /// Mode name not present in the theme table.
    UnknownMode(String),
    /// Formation name not known to the dispatcher.
    UnknownFormation(String),
    /// Shape payload could not be mapped to a shape.
    MalformedShape(String),
    /// Shape payload or config was not valid JSON.
    Payload(serde_json::Error),
}

impl fmt::Display for ChamberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChamberError::InvalidDimensions { width, height } => {
                write!(f, "invalid canvas dimensions {width}x{height}")
            }
            ChamberError::EmptyParticleSet => write!(f, "particle count must be at least 1"),
            ChamberError::UnknownMode(name) => write!(f, "unknown mode: {name}"),
            ChamberError::UnknownFormation(name) => write!(f, "unknown formation: {name}"),
            ChamberError::MalformedShape(msg) => write!(f, "malformed shape payload: {msg}"),
            ChamberError::Payload(e) => write!(f, "invalid JSON: {e}"),
        }
    }
}

impl std::error::Error for ChamberError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChamberError::Payload(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ChamberError {
    fn from(e: serde_json::Error) -> Self {
        ChamberError::Payload(e)
    }
}

pub type Result<T> = std::result::Result<T, ChamberError>;

/// Reject zero, negative and non-finite canvas sizes.
pub fn check_dimensions(width: f32, height: f32) -> Result<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(ChamberError::InvalidDimensions { width, height })
    }
}
