//! Holographic chamber particle engine.
//!
//! A few hundred particles drift in a pseudo-3D volume, converge into
//! mathematical formations on request, hold and spin them for presentation,
//! and relax back into ambient motion. Rendering goes through
//! [`render::RenderTarget`] so the engine runs the same in a browser or a test.
pub mod chamber;
pub mod config;
pub mod driver;
pub mod effects;
pub mod error;
pub mod governor;
pub mod math;
pub mod particle;
pub mod render;
pub mod rotation;
pub mod shapes;
pub mod status;
pub mod theme;
pub mod transition;

pub use chamber::HolographicChamber;
pub use config::{ChamberConfig, GovernorConfig, Spring};
pub use driver::AnimationDriver;
pub use error::{ChamberError, Result};
pub use governor::{OptimalSettings, PerformanceGovernor};
pub use render::{Hsla, PointVertex, RenderTarget};
pub use shapes::{Formation, ShapeKind, ShapePayload};
pub use status::{StatusHandle, StatusSnapshot};
pub use theme::{Mode, Theme};
pub use transition::{HoldOptions, TransitionPhase};
