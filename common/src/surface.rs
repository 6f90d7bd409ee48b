//! Surface and mount-lifetime identifiers.

use std::fmt::{Display, Formatter, Result as FormatResult};

use serde::{Deserialize, Serialize};

/// Identifies one isolated rendering surface owned by the host.
///
/// The id is channel identity only: the bridge routes frames by it but never
/// treats it as proof of who produced a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SurfaceId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for SurfaceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Monotonic counter identifying one mount lifetime of a surface.
///
/// Generation `0` means "never mounted"; the first mount is generation `1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    pub const UNMOUNTED: Generation = Generation(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// The generation that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// True when `self` belongs to an older mount than `current`.
    pub fn is_stale_against(self, current: Generation) -> bool {
        self < current
    }

    /// True when `self` is newer than `current`, i.e. was never mounted.
    pub fn is_ahead_of(self, current: Generation) -> bool {
        self > current
    }
}

impl Display for Generation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "g{}", self.0)
    }
}
