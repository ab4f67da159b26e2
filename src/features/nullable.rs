//! Nullable numeric cell with the arithmetic and comparison rules the derived features rely on.
//!
//! Rules:
//! - `diff` of two values is null when either side is null.
//! - `eq_zero(null)` is `false`; `ne_zero(null)` is `true`.
//! - `or(v)` substitutes `v` for null and leaves values untouched.
//!
//! Snort and Suricata only differ in their edge cases through these rules, so the
//! sensor strategies express their flags in terms of them instead of matching on
//! `Option` directly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nullable(Option<f64>);

impl Nullable {
    pub const NULL: Nullable = Nullable(None);

    pub fn new(v: f64) -> Self {
        if v.is_nan() {
            Self::NULL
        } else {
            Nullable(Some(v))
        }
    }

    pub fn get(self) -> Option<f64> {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0.is_none()
    }

    /// `self - prev`, null if either is null.
    pub fn diff(self, prev: Nullable) -> Nullable {
        match (self.0, prev.0) {
            (Some(a), Some(b)) => Nullable::new(a - b),
            _ => Self::NULL,
        }
    }

    pub fn or(self, fill: f64) -> f64 {
        self.0.unwrap_or(fill)
    }

    pub fn eq_zero(self) -> bool {
        self.0 == Some(0.0)
    }

    pub fn ne_zero(self) -> bool {
        self.0 != Some(0.0)
    }

    /// Parse trimmed numeric text; anything unparseable (or `NaN`) is null.
    pub fn parse(text: &str) -> Nullable {
        text.trim()
            .parse::<f64>()
            .map(Nullable::new)
            .unwrap_or(Self::NULL)
    }
}

impl From<f64> for Nullable {
    fn from(v: f64) -> Self {
        Nullable::new(v)
    }
}

impl From<Option<f64>> for Nullable {
    fn from(v: Option<f64>) -> Self {
        v.map(Nullable::new).unwrap_or(Self::NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_comparisons() {
        assert!(!Nullable::NULL.eq_zero());
        assert!(Nullable::NULL.ne_zero());
        assert!(Nullable::new(0.0).eq_zero());
        assert!(!Nullable::new(0.0).ne_zero());
    }

    #[test]
    fn diff_propagates_null() {
        assert_eq!(Nullable::new(80.0).diff(Nullable::new(80.0)), Nullable::new(0.0));
        assert!(Nullable::new(80.0).diff(Nullable::NULL).is_null());
        assert!(Nullable::NULL.diff(Nullable::new(80.0)).is_null());
    }

    #[test]
    fn parse_coerces_garbage_to_null() {
        assert_eq!(Nullable::parse(" 443 ").get(), Some(443.0));
        assert_eq!(Nullable::parse("80.5").get(), Some(80.5));
        assert!(Nullable::parse("http").is_null());
        assert!(Nullable::parse("NaN").is_null());
        assert!(Nullable::parse("").is_null());
    }
}
