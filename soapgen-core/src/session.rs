use std::collections::{HashMap, HashSet};

use crate::registry::{FaultRegistry, NameRegistry};
use crate::wrapper::WrapperKind;

/// The operation that first generated a wrapper name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperClaim {
    pub operation: String,
    pub kind: WrapperKind,
}

/// Mutable state of one build pass.
///
/// Owned by the caller and threaded through synthesis by `&mut`; two passes
/// that must not see each other's names use two sessions.
#[derive(Debug, Default)]
pub struct BuildSession {
    pub names: NameRegistry,
    pub faults: FaultRegistry,
    /// Qualified request and response wrapper names already generated.
    pub wrappers: HashMap<String, WrapperClaim>,
    /// Generated packages that already received a schema marker.
    pub packages: HashSet<String>,
}

impl BuildSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.names.clear();
        self.faults.clear();
        self.wrappers.clear();
        self.packages.clear();
    }
}
