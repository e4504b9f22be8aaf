//! Optical mode identifiers and mode-count bounds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest number of modes a circuit can have.
pub const MIN_MODES: u32 = 1;

/// Largest number of modes a circuit can have.
pub const MAX_MODES: u32 = 8;

/// Number of modes in a freshly created circuit.
pub const DEFAULT_MODES: u32 = 2;

/// Index of an optical mode (a wire in the circuit diagram).
///
/// Modes are not validated on construction: an operation may sit on a mode
/// that is out of range for its circuit, in which case it is dormant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModeId(pub u32);

impl ModeId {
    /// The mode immediately to the right of this one.
    #[inline]
    pub fn next(self) -> ModeId {
        ModeId(self.0.saturating_add(1))
    }

    /// Index suitable for slicing per-mode buckets.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ModeId {
    fn from(id: u32) -> Self {
        ModeId(id)
    }
}

/// Clamp a requested mode count into `[MIN_MODES, MAX_MODES]`.
#[inline]
pub fn clamp_mode_count(n: u32) -> u32 {
    n.clamp(MIN_MODES, MAX_MODES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_mode_count() {
        assert_eq!(clamp_mode_count(0), 1);
        assert_eq!(clamp_mode_count(1), 1);
        assert_eq!(clamp_mode_count(5), 5);
        assert_eq!(clamp_mode_count(8), 8);
        assert_eq!(clamp_mode_count(42), 8);
    }

    #[test]
    fn test_mode_next_and_display() {
        assert_eq!(ModeId(3).next(), ModeId(4));
        assert_eq!(ModeId(u32::MAX).next(), ModeId(u32::MAX));
        assert_eq!(ModeId(2).to_string(), "2");
        assert_eq!(ModeId::from(7).index(), 7);
    }
}
