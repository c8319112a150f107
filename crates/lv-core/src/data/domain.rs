use serde::{Deserialize, Serialize};

use super::DataError;

/// A `[min, max]` interval shared by every view charting the same attribute
/// so that their axes stay comparable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct SharedDomain {
    min: f64,
    max: f64,
}

impl SharedDomain {
    /// Create a domain, ordering the bounds. Non-finite bounds are rejected.
    pub fn new(a: f64, b: f64) -> Result<Self, DataError> {
        if !a.is_finite() || !b.is_finite() {
            return Err(DataError::InvalidDomain { min: a, max: b });
        }
        Ok(Self {
            min: a.min(b),
            max: a.max(b),
        })
    }

    /// Extent of the finite values, `None` when there are none
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Self::new(min, max).ok()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl TryFrom<[f64; 2]> for SharedDomain {
    type Error = DataError;

    fn try_from(bounds: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(bounds[0], bounds[1])
    }
}

impl From<SharedDomain> for [f64; 2] {
    fn from(domain: SharedDomain) -> Self {
        [domain.min, domain.max]
    }
}
