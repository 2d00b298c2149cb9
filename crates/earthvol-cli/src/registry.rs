//! Named-algorithm registry.
//!
//! Hosts that dispatch work by name (batch runners, job schedulers) look
//! algorithms up here instead of hard-coding subcommands. The registry is a
//! static table; dispatch itself stays in the binary.

/// Metadata for one registered algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmDescriptor {
    /// Stable identifier used for dispatch.
    pub id: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
    /// One-line description.
    pub summary: &'static str,
}

/// Identifier of the cut/fill volume sweep algorithm.
pub const SURFACE_VOLUME_SWEEP: &str = "surface-volume-sweep";

/// All registered algorithms.
pub const ALGORITHMS: &[AlgorithmDescriptor] = &[AlgorithmDescriptor {
    id: SURFACE_VOLUME_SWEEP,
    display_name: "Calculate heap volume from DEM",
    summary: "Clip a DEM to a boundary polygon and tabulate cut/fill volumes \
              across swept elevation levels",
}];

/// Look up a registered algorithm by id.
pub fn find(id: &str) -> Option<&'static AlgorithmDescriptor> {
    ALGORITHMS.iter().find(|descriptor| descriptor.id == id)
}
