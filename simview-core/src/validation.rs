use crate::error::RangeError;
use serde::{Deserialize, Serialize};

/// Y-axis extent of a plot. Always finite with `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct ValueRange {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct RawRange {
    min: f64,
    max: f64,
}

impl TryFrom<RawRange> for ValueRange {
    type Error = RangeError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max)
    }
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Result<Self, RangeError> {
        Validator::validate_range(min, max)?;
        Ok(Self { min, max })
    }

    /// For compile-time constants already known to be ordered.
    pub(crate) const fn bounded(min: f64, max: f64) -> Self {
        Self { min, max }
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

impl std::fmt::Display for ValueRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.min, self.max)
    }
}

impl std::str::FromStr for ValueRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Validator::parse_range(s)
    }
}

pub struct Validator;

impl Validator {
    /// Parses user input of the form `"<min>,<max>"`.
    pub fn parse_range(text: &str) -> Result<ValueRange, RangeError> {
        let parts: Vec<&str> = text.split(',').map(str::trim).collect();
        let [min, max] = parts.as_slice() else {
            return Err(RangeError::Format);
        };
        let min = Self::parse_number(min)?;
        let max = Self::parse_number(max)?;
        ValueRange::new(min, max)
    }

    pub fn validate_range(min: f64, max: f64) -> Result<(), RangeError> {
        if !min.is_finite() {
            return Err(RangeError::NotNumeric(min.to_string()));
        }
        if !max.is_finite() {
            return Err(RangeError::NotNumeric(max.to_string()));
        }
        if min >= max {
            return Err(RangeError::Inverted { min, max });
        }
        Ok(())
    }

    /// Clamps `value` into `[min, max]`; `min` wins if the bounds cross.
    pub fn clip(value: f64, min: f64, max: f64) -> f64 {
        value.min(max).max(min)
    }

    fn parse_number(text: &str) -> Result<f64, RangeError> {
        if text.is_empty() {
            return Err(RangeError::Format);
        }
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(RangeError::NotNumeric(text.to_string())),
        }
    }
}
