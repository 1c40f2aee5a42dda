use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

/// Read-only aggregate published for polling UIs.
///
/// Derived from the particle set; never a source of truth.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StatusSnapshot {
    /// Fraction of in-formation particles settled on their targets.
    pub coherence: f32,
    /// Mean particle energy.
    pub energy: f32,
    pub mode: String,
    pub formation: String,
    /// Epoch milliseconds.
    pub timestamp: f64,
}

impl StatusSnapshot {
    pub fn to_json(&self) -> String {
        // plain numbers and strings always serialise
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Shared handle to the latest snapshot. The chamber writes, anyone reads.
pub type StatusHandle = Rc<RefCell<StatusSnapshot>>;
