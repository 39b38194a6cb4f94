//! Renderer configuration built from the host's `init` options.

use crate::error::{BridgeError, Result};
use std::collections::BTreeMap;
use std::str::FromStr;

/// String options exactly as the host passed them to `init`.
///
/// The protocol layer does not look at these; the renderer decides which keys
/// it understands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMap {
    values: BTreeMap<String, String>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Parse `key` as `T`, falling back to `default` when it is absent.
    pub fn get_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.values.get(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|e| {
                BridgeError::Configuration(format!("Invalid value '{}' for '{}': {}", raw, key, e))
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<BTreeMap<String, String>> for ParameterMap {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Settings understood by [`DirectMixRenderer`](crate::renderer::DirectMixRenderer).
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub name: String,
    pub sample_rate: u32,
    /// Frames per channel in every audio block
    pub block_size: usize,
    /// Number of loudspeakers loaded by the reproduction setup
    pub loudspeakers: usize,
    /// Radius of the circular loudspeaker array, in meters
    pub array_radius: f32,
}

const KNOWN_KEYS: [&str; 5] = [
    "name",
    "sample_rate",
    "block_size",
    "loudspeakers",
    "array_radius",
];

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            name: "DirectMix".to_string(),
            sample_rate: 44100,
            block_size: 1024,
            loudspeakers: 2,
            array_radius: 1.5,
        }
    }
}

impl RendererConfig {
    pub fn from_params(params: &ParameterMap) -> Result<Self> {
        let defaults = Self::default();

        for (key, value) in params.iter() {
            if !KNOWN_KEYS.contains(&key) {
                log::debug!("Ignoring renderer option {} = {}", key, value);
            }
        }

        let config = Self {
            name: params
                .get("name")
                .map(str::to_string)
                .unwrap_or(defaults.name),
            sample_rate: params.get_or("sample_rate", defaults.sample_rate)?,
            block_size: params.get_or("block_size", defaults.block_size)?,
            loudspeakers: params.get_or("loudspeakers", defaults.loudspeakers)?,
            array_radius: params.get_or("array_radius", defaults.array_radius)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(BridgeError::Configuration(
                "sample_rate must be greater than 0".to_string(),
            ));
        }
        if self.block_size == 0 {
            return Err(BridgeError::Configuration(
                "block_size must be greater than 0".to_string(),
            ));
        }
        if self.loudspeakers == 0 {
            return Err(BridgeError::Configuration(
                "loudspeakers must be greater than 0".to_string(),
            ));
        }
        if !(self.array_radius.is_finite() && self.array_radius > 0.0) {
            return Err(BridgeError::Configuration(
                "array_radius must be a positive number".to_string(),
            ));
        }
        Ok(())
    }
}
