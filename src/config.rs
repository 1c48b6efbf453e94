//! Storage filter configuration.
//!
//! ```toml
//! [storage]
//! values = "whitelist"
//! list = ["pressure"]
//!
//! [tag.BBBBBBBBBBBB.storage]
//! values = "blacklist"
//! list = ["accelerationX", "accelerationY", "accelerationZ"]
//! ```
//!
//! `values` is one of `extended` (the default, store everything), `raw`
//! (store measured values only), `whitelist` or `blacklist`. The file is
//! resolved once into a [`FilterResolver`]; nothing is parsed per
//! measurement.

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::Path,
};

use serde::Deserialize;
use tracing::debug;

use crate::{
    error::ConfigurationError,
    filter::{FilterPolicy, FilterResolver},
    ruuvi::{DATA_FORMAT, Field, MAC, TIME},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    #[default]
    Extended,
    Raw,
    Whitelist,
    Blacklist,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Extended => "extended",
            StorageMode::Raw => "raw",
            StorageMode::Whitelist => "whitelist",
            StorageMode::Blacklist => "blacklist",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    storage: StorageSection,

    #[serde(default)]
    tag: BTreeMap<String, TagSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TagSection {
    storage: Option<StorageSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StorageSection {
    #[serde(default)]
    values: StorageMode,

    list: Option<Vec<String>>,
}

pub fn load_filters(path: impl AsRef<Path>) -> Result<FilterResolver, ConfigurationError> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_filters(&s)
}

pub fn parse_filters(s: &str) -> Result<FilterResolver, ConfigurationError> {
    let config: FileConfig = toml::from_str(s)?;

    let mut resolver = FilterResolver::new(resolve_policy("global", config.storage)?);

    for (device_tag, section) in config.tag {
        if device_tag.is_empty() {
            return Err(ConfigurationError::EmptyDeviceTag);
        }

        let Some(storage) = section.storage else {
            continue;
        };

        let policy = resolve_policy(&format!("tag {device_tag}"), storage)?;
        resolver = resolver.with_override(device_tag, policy);
    }

    debug!(
        global = ?resolver.global(),
        overrides = resolver.overrides().len(),
        "loaded storage filters"
    );

    Ok(resolver)
}

fn resolve_policy(
    scope: &str,
    section: StorageSection,
) -> Result<FilterPolicy, ConfigurationError> {
    match (section.values, section.list) {
        (StorageMode::Extended, None) => Ok(FilterPolicy::AllowAll),
        (StorageMode::Raw, None) => Ok(FilterPolicy::raw()),
        (mode @ (StorageMode::Extended | StorageMode::Raw), Some(_)) => {
            Err(ConfigurationError::UnexpectedList {
                scope: scope.to_string(),
                mode: mode.as_str(),
            })
        }
        (StorageMode::Whitelist, list) => Ok(FilterPolicy::Whitelist(field_set(scope, list)?)),
        (StorageMode::Blacklist, list) => Ok(FilterPolicy::Blacklist(field_set(scope, list)?)),
    }
}

fn field_set(
    scope: &str,
    list: Option<Vec<String>>,
) -> Result<HashSet<String>, ConfigurationError> {
    list.unwrap_or_default()
        .into_iter()
        .map(|field| {
            let structural = [MAC, DATA_FORMAT, TIME].contains(&field.as_str());
            if !structural && Field::by_name(&field).is_none() {
                return Err(ConfigurationError::UnknownField {
                    scope: scope.to_string(),
                    field,
                });
            }
            Ok(field)
        })
        .collect()
}
