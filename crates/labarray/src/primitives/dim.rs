//! Dimension labels.
//!
//! A dimension label identifies an axis by name rather than by position.
//! Labels are drawn from a closed set and compared by identity; two
//! dimensions with the same label align in arithmetic regardless of where
//! they appear in a shape.

// External dependencies
use core::fmt::{Display, Formatter, Result};

// A named axis identifier.
//
// `Invalid` is a sentinel and never names a real axis; operations reject it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dim {
    Detector,
    Energy,
    Position,
    Q,
    Row,
    Spectrum,
    Temperature,
    Time,
    Tof,
    Wavelength,
    X,
    Y,
    Z,
    Invalid,
}

impl Dim {
    // Human-readable label name.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Dim::Detector => "Detector",
            Dim::Energy => "Energy",
            Dim::Position => "Position",
            Dim::Q => "Q",
            Dim::Row => "Row",
            Dim::Spectrum => "Spectrum",
            Dim::Temperature => "Temperature",
            Dim::Time => "Time",
            Dim::Tof => "Tof",
            Dim::Wavelength => "Wavelength",
            Dim::X => "X",
            Dim::Y => "Y",
            Dim::Z => "Z",
            Dim::Invalid => "Invalid",
        }
    }
}

impl Display for Dim {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.name())
    }
}
