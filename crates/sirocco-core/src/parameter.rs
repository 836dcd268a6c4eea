//! Parameter port descriptions and host-tolerant value handling.
//!
//! Each control port is described by a [`ParameterSpec`] in a static,
//! data-driven table. The host guarantees values stay within the declared
//! range in practice, but the core clamps anyway instead of trusting it.

use crate::error::{Error, Result};

/// Raw port value above which a toggle port is considered "on".
pub const TOGGLE_THRESHOLD: f32 = 0.001;

/// Semantic type of a control port value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterScale {
    /// Continuous float in `[min, max]`.
    #[default]
    Linear,
    /// 0/1 switch, read through [`TOGGLE_THRESHOLD`].
    Toggle,
    /// Integer enum index in `[min, max]`.
    Enumeration,
}

/// Static description of one control port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    /// Stable port symbol, unique within a plugin.
    pub symbol: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    pub default: f32,
    pub min: f32,
    pub max: f32,
    pub scale: ParameterScale,
}

impl ParameterSpec {
    pub const fn linear(
        symbol: &'static str,
        name: &'static str,
        default: f32,
        min: f32,
        max: f32,
    ) -> Self {
        Self {
            symbol,
            name,
            default,
            min,
            max,
            scale: ParameterScale::Linear,
        }
    }

    pub const fn toggle(symbol: &'static str, name: &'static str, default_on: bool) -> Self {
        Self {
            symbol,
            name,
            default: if default_on { 1.0 } else { 0.0 },
            min: 0.0,
            max: 1.0,
            scale: ParameterScale::Toggle,
        }
    }

    pub const fn enumeration(
        symbol: &'static str,
        name: &'static str,
        default: u32,
        count: u32,
    ) -> Self {
        Self {
            symbol,
            name,
            default: default as f32,
            min: 0.0,
            max: (count - 1) as f32,
            scale: ParameterScale::Enumeration,
        }
    }

    /// Check the spec is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.min >= self.max {
            return Err(Error::InvalidParameterSpec {
                symbol: self.symbol,
            });
        }
        Ok(())
    }

    /// Clamp a raw host value into the declared range. NaN falls back to the
    /// default so a corrupt snapshot cannot poison the per-sample path.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }

    /// Read a toggle port the way the original ports are read: anything above
    /// a small threshold counts as on.
    #[inline]
    pub fn as_toggle(&self, value: f32) -> bool {
        value > TOGGLE_THRESHOLD
    }

    /// Read an enum port as an index, rounding and clamping out-of-range
    /// host values to the nearest valid variant.
    #[inline]
    pub fn as_index(&self, value: f32) -> usize {
        self.clamp(value).round().max(0.0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_over_range() {
        let spec = ParameterSpec::linear("freq", "Frequency", 1.0, 0.01, 60.0);
        assert_eq!(spec.clamp(100.0), 60.0);
        assert_eq!(spec.clamp(-5.0), 0.01);
        assert_eq!(spec.clamp(2.5), 2.5);
    }

    #[test]
    fn test_nan_falls_back_to_default() {
        let spec = ParameterSpec::linear("shift", "Shift", 0.5, 0.0, 1.0);
        assert_eq!(spec.clamp(f32::NAN), 0.5);
    }

    #[test]
    fn test_toggle_threshold() {
        let spec = ParameterSpec::toggle("freerun", "Free running", false);
        assert!(!spec.as_toggle(0.0));
        assert!(!spec.as_toggle(0.001));
        assert!(spec.as_toggle(0.01));
        assert!(spec.as_toggle(1.0));
    }

    #[test]
    fn test_enum_index_clamps() {
        let spec = ParameterSpec::enumeration("sync_rate", "Sync rate", 7, 15);
        assert_eq!(spec.as_index(3.4), 3);
        assert_eq!(spec.as_index(99.0), 14);
        assert_eq!(spec.as_index(-1.0), 0);
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let spec = ParameterSpec::linear("bad", "Bad", 0.0, 1.0, 0.0);
        assert!(spec.validate().is_err());
    }
}
