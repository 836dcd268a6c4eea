//! Plugin lifecycle trait and host capability negotiation.
//!
//! The shells stay binding-agnostic: a host adapter collects the features it
//! can offer into [`HostFeatures`], constructs the plugin, and drives it
//! through [`Plugin`]. Everything block-scoped travels through the `BlockIo`
//! type the plugin defines for itself.

use std::fmt;

use crate::error::InstantiateError;

/// Host capabilities a plugin may require or opportunistically use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostFeature {
    /// URI <-> integer mapping; prerequisite for any event I/O.
    UridMap,
    /// Off-audio-thread work scheduling.
    WorkerSchedule,
    /// Host-provided logger sink.
    Log,
}

impl HostFeature {
    pub fn all() -> &'static [HostFeature] {
        &[
            HostFeature::UridMap,
            HostFeature::WorkerSchedule,
            HostFeature::Log,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            HostFeature::UridMap => "urid:map",
            HostFeature::WorkerSchedule => "worker:schedule",
            HostFeature::Log => "log:log",
        }
    }

    #[inline]
    fn bit(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for HostFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of features the host offered at instantiate time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostFeatures {
    provided: [bool; 3],
}

impl HostFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, feature: HostFeature) -> Self {
        self.provided[feature.bit()] = true;
        self
    }

    #[inline]
    pub fn has(&self, feature: HostFeature) -> bool {
        self.provided[feature.bit()]
    }

    /// Fail instantiation when a hard requirement is missing.
    pub fn require(&self, feature: HostFeature) -> Result<(), InstantiateError> {
        if self.has(feature) {
            Ok(())
        } else {
            tracing::error!(feature = feature.name(), "host feature missing");
            Err(InstantiateError::MissingFeature(feature))
        }
    }
}

/// The narrow lifecycle surface a host binding drives.
pub trait Plugin {
    /// Everything the plugin touches during one block.
    type BlockIo<'a, 'b>
    where
        Self: 'a + 'b,
        'b: 'a;

    fn activate(&mut self);

    /// Process one block. Must not allocate or block.
    fn run(&mut self, io: Self::BlockIo<'_, '_>);

    fn deactivate(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_negotiation() {
        let features = HostFeatures::new().with(HostFeature::UridMap);
        assert!(features.has(HostFeature::UridMap));
        assert!(!features.has(HostFeature::WorkerSchedule));
        assert!(features.require(HostFeature::UridMap).is_ok());
        assert_eq!(
            features.require(HostFeature::WorkerSchedule),
            Err(InstantiateError::MissingFeature(
                HostFeature::WorkerSchedule
            ))
        );
    }
}
