use std::{error::Error as StdError, io, path::PathBuf};

use thiserror::Error;

/// Malformed filter configuration. Only raised while loading; resolving a
/// policy for a device never fails.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to read configuration file: {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),

    #[error("unknown field {field:?} in {scope} storage list")]
    UnknownField { scope: String, field: String },

    #[error("{scope} storage mode {mode:?} does not take a field list")]
    UnexpectedList { scope: String, mode: &'static str },

    #[error("device tag must not be empty")]
    EmptyDeviceTag,
}

/// Fault while assembling a point. No partial point is ever returned.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("field filter failed for {field:?}")]
    Predicate {
        field: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// Text that does not parse as the field's type.
#[derive(Debug, Error)]
#[error("invalid {field} value: {value:?}")]
pub struct FieldParseError {
    pub field: &'static str,

    pub value: String,

    #[source]
    pub source: Box<dyn StdError + Send + Sync>,
}
