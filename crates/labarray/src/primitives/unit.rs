//! Units of measurement.
//!
//! A minimal unit token sufficient for the array engine's contract:
//! equality, multiplication and division, and a canonical `counts` token
//! for event weights. Units are exponent vectors over a small basis
//! (counts, length, time); the full physical-unit system lives outside
//! this crate.

// External dependencies
use core::fmt::{Display, Formatter, Result};
use core::ops::{Div, Mul};

/// A unit token: integer exponents over {counts, length, time}.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Unit {
    counts: i8,
    length: i8,
    time: i8,
}

impl Unit {
    /// The dimensionless unit.
    #[inline]
    pub const fn dimensionless() -> Self {
        Self {
            counts: 0,
            length: 0,
            time: 0,
        }
    }

    /// The canonical counts token carried by event weights.
    #[inline]
    pub const fn counts() -> Self {
        Self {
            counts: 1,
            length: 0,
            time: 0,
        }
    }

    /// Meters.
    #[inline]
    pub const fn m() -> Self {
        Self {
            counts: 0,
            length: 1,
            time: 0,
        }
    }

    /// Seconds.
    #[inline]
    pub const fn s() -> Self {
        Self {
            counts: 0,
            length: 0,
            time: 1,
        }
    }

    /// Human-readable unit name, e.g. `counts`, `m^2/s`, `dimensionless`.
    pub fn name(&self) -> String {
        fn push(out: &mut String, symbol: &str, exponent: i8) {
            if exponent == 0 {
                return;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(symbol);
            if exponent != 1 {
                out.push('^');
                out.push_str(&exponent.to_string());
            }
        }

        let mut numerator = String::new();
        let mut denominator = String::new();
        for (symbol, exponent) in [("counts", self.counts), ("m", self.length), ("s", self.time)] {
            if exponent > 0 {
                push(&mut numerator, symbol, exponent);
            } else {
                push(&mut denominator, symbol, -exponent);
            }
        }
        match (numerator.is_empty(), denominator.is_empty()) {
            (true, true) => "dimensionless".to_string(),
            (false, true) => numerator,
            (true, false) => format!("1/{}", denominator),
            (false, false) => format!("{}/{}", numerator, denominator),
        }
    }
}

impl Mul for Unit {
    type Output = Unit;

    fn mul(self, rhs: Unit) -> Unit {
        Unit {
            counts: self.counts + rhs.counts,
            length: self.length + rhs.length,
            time: self.time + rhs.time,
        }
    }
}

impl Div for Unit {
    type Output = Unit;

    fn div(self, rhs: Unit) -> Unit {
        Unit {
            counts: self.counts - rhs.counts,
            length: self.length - rhs.length,
            time: self.time - rhs.time,
        }
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.name())
    }
}
