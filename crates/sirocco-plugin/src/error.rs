//! Instantiate-time failures.
//!
//! Construction is the only fallible stage; once a plugin exists, the block
//! path is infallible by design.

use thiserror::Error;

use crate::descriptor::HostFeature;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum InstantiateError {
    /// The host did not provide a capability the plugin cannot run without.
    #[error("required host feature missing: {0}")]
    MissingFeature(HostFeature),

    /// A port table entry is internally inconsistent.
    #[error("invalid port table entry `{symbol}`")]
    InvalidPortTable { symbol: &'static str },

    #[error("unusable sample rate {0}")]
    InvalidSampleRate(f32),
}
