//! Semantic time type for the simulation clock
//!
//! Deadlines for ignition delays, growth animation and spread attempts are all
//! expressed as absolute [`Seconds`] on the simulation clock. Configuration
//! durations stay plain `f32` seconds; they are converted at the point where a
//! deadline is computed.
//!
//! # Usage
//! ```
//! use fire_spread_core::core_types::units::Seconds;
//!
//! let now = Seconds::new(1.5);
//! let deadline = now + Seconds::from(0.5_f32);
//! assert!(deadline > now);
//! assert_eq!(*deadline, 2.0);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Sub};

/// Absolute simulation time or a span of simulation time, in seconds.
///
/// Uses f64 so that long sessions built from many small ticks keep enough
/// precision for deadline comparisons. Total ordering via `total_cmp` makes
/// the type usable as a priority-queue key.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Seconds(f64);

impl Eq for Seconds {}

impl PartialOrd for Seconds {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Seconds {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for Seconds {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Seconds {
    /// Start of the simulation clock
    pub const ZERO: Seconds = Seconds(0.0);

    /// Create a new time value
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Seconds(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert to f32 for per-tick arithmetic on effect state
    #[inline]
    #[must_use]
    pub fn as_f32(self) -> f32 {
        self.0 as f32
    }
}

impl From<f32> for Seconds {
    fn from(v: f32) -> Self {
        Seconds(f64::from(v))
    }
}

impl From<f64> for Seconds {
    fn from(v: f64) -> Self {
        Seconds(v)
    }
}

impl From<Seconds> for f64 {
    fn from(s: Seconds) -> f64 {
        s.0
    }
}

impl Add for Seconds {
    type Output = Seconds;
    fn add(self, rhs: Seconds) -> Seconds {
        Seconds(self.0 + rhs.0)
    }
}

impl AddAssign for Seconds {
    fn add_assign(&mut self, rhs: Seconds) {
        self.0 += rhs.0;
    }
}

impl Sub for Seconds {
    type Output = Seconds;
    fn sub(self, rhs: Seconds) -> Seconds {
        Seconds(self.0 - rhs.0)
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} s", self.0)
    }
}
