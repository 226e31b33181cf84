//! Container identity tokens

use std::fmt;
use uuid::Uuid;

/// Unique, opaque identity of one container scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerToken(Uuid);

impl ContainerToken {
    /// Create a fresh token
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ContainerToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContainerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
