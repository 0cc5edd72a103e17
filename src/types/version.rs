// ABOUTME: Swarm object version used for optimistic concurrency.
// ABOUTME: Updates must echo the index the caller last observed.

use serde::{Deserialize, Serialize};

/// The version marker the engine attaches to every swarm object.
///
/// Each update bumps the index; an update carrying an older index is
/// rejected so concurrent writers cannot silently overwrite each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectVersion {
    #[serde(rename = "Index", default)]
    pub index: u64,
}

impl ObjectVersion {
    pub fn new(index: u64) -> Self {
        Self { index }
    }
}
