//! This module defines the unit types used for plant quantities.
use serde::Serialize;

/// Nameplate capacity of a plant, in whatever unit its source sheet uses.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, derive_more::Add)]
#[serde(transparent)]
pub struct Capacity(pub f64);

impl Capacity {
    /// Returns the value as a f64.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether the value is a usable plant capacity (finite and non-negative)
    pub fn is_valid(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

impl std::iter::Sum for Capacity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, x| acc + x)
    }
}
