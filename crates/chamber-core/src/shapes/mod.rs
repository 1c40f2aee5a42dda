//! Formation generators.
//!
//! Analytic primitives, the fractal outline, the tagged shape description
//! decoded from external payloads, and a dispatcher that turns a shape into
//! canvas-space target points.
pub mod primitives;
pub mod fractal;
pub mod kind;
pub mod dispatcher;

use glam::Vec3;

pub use dispatcher::{distribute, generate, vertices};
pub use kind::{Formation, ShapeKind, ShapePayload, ShapeProperties, SpiralType};

/// Role of a target point inside its formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointTag {
    /// Sample of a continuous surface.
    Surface,
    /// Corner or sample of a curve in a vertex-based shape.
    Vertex,
    /// Interpolated point along a wireframe edge.
    Edge,
    /// First DNA strand.
    Backbone1,
    /// Second DNA strand.
    Backbone2,
    /// DNA cross-rung between the two strands.
    BasePair,
    /// Idle home point, not part of any shape.
    Ambient,
}

/// One target point produced by a formation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationPoint {
    pub position: Vec3,
    pub tag: PointTag,
    /// Index of the vertex this point was derived from.
    pub vertex: usize,
}
