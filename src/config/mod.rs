// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration for one-note-midi.
//!
//! An optional TOML or YAML file supplies note defaults and picks the
//! output. Flags override the file; `ONE_NOTE_MIDI_BACKEND` overrides the
//! configured backend.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::midi::{Backend, PortSelector};
use crate::music::RawNote;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "ONE_NOTE_MIDI_CONFIG";
/// Environment variable overriding the output backend
pub const BACKEND_ENV: &str = "ONE_NOTE_MIDI_BACKEND";
/// Config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "one-note-midi.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML configuration {path:?}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to parse YAML configuration {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Unknown backend '{0}' (expected auto, live or null)")]
    UnknownBackend(String),
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Note defaults used when a flag is not given
    #[serde(default)]
    pub defaults: NoteDefaults,
    /// Output selection
    #[serde(default)]
    pub output: OutputConfig,
}

/// Note defaults. Values are limit-checked together with the flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteDefaults {
    #[serde(default = "default_channel")]
    pub channel: u32,
    #[serde(default = "default_instrument")]
    pub instrument: u32,
    #[serde(default = "default_pitch")]
    pub pitch: u32,
    #[serde(default = "default_velocity")]
    pub velocity: u32,
    /// Note length in milliseconds
    #[serde(default = "default_length_ms")]
    pub length_ms: u32,
}

fn default_channel() -> u32 {
    RawNote::default().channel
}
fn default_instrument() -> u32 {
    RawNote::default().instrument
}
fn default_pitch() -> u32 {
    RawNote::default().pitch
}
fn default_velocity() -> u32 {
    RawNote::default().velocity
}
fn default_length_ms() -> u32 {
    RawNote::default().length_ms
}

impl Default for NoteDefaults {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            instrument: default_instrument(),
            pitch: default_pitch(),
            velocity: default_velocity(),
            length_ms: default_length_ms(),
        }
    }
}

impl NoteDefaults {
    pub fn to_raw(&self) -> RawNote {
        RawNote {
            channel: self.channel,
            instrument: self.instrument,
            pitch: self.pitch,
            velocity: self.velocity,
            length_ms: self.length_ms,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Port index or part of a port name
    #[serde(default)]
    pub port: Option<String>,
}

impl OutputConfig {
    pub fn port_selector(&self) -> PortSelector {
        self.port
            .as_deref()
            .map(PortSelector::parse)
            .unwrap_or_default()
    }
}

impl AppConfig {
    /// Load a configuration file, choosing the format by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => {
                Self::from_yaml(&contents).map_err(|source| ConfigError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })
            }
            _ => Self::from_toml(&contents).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse a configuration from TOML string
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Parse a configuration from YAML string
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Resolve the config for this process: file from the environment or
    /// working directory, then the backend override.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match config_path(env::var_os(CONFIG_ENV).map(PathBuf::from)) {
            Some(path) => {
                debug!("Loading config from {:?}", path);
                Self::load(path)?
            }
            None => Self::default(),
        };

        if let Ok(name) = env::var(BACKEND_ENV) {
            config.apply_backend_override(&name)?;
        }

        Ok(config)
    }

    /// Replace the configured backend by name
    pub fn apply_backend_override(&mut self, name: &str) -> Result<(), ConfigError> {
        self.output.backend =
            Backend::from_name(name).ok_or_else(|| ConfigError::UnknownBackend(name.to_string()))?;
        debug!("Backend overridden to {:?}", self.output.backend);
        Ok(())
    }
}

/// The explicit path wins; otherwise the default file if it exists.
fn config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        local.is_file().then_some(local)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.defaults.to_raw(), RawNote::default());
        assert_eq!(config.output.backend, Backend::Auto);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[defaults]
instrument = 40
length_ms = 500

[output]
backend = "null"
port = "FluidSynth"
"#;
        let config = AppConfig::from_toml(toml).unwrap();
        assert_eq!(config.defaults.instrument, 40);
        assert_eq!(config.defaults.length_ms, 500);
        assert_eq!(config.defaults.pitch, 60);
        assert_eq!(config.output.backend, Backend::Null);
        assert_eq!(
            config.output.port_selector(),
            PortSelector::Name("FluidSynth".to_string())
        );
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
defaults:
  channel: 9
  pitch: 38
output:
  backend: live
  port: "1"
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.defaults.channel, 9);
        assert_eq!(config.defaults.pitch, 38);
        assert_eq!(config.output.backend, Backend::Live);
        assert_eq!(config.output.port_selector(), PortSelector::Index(1));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempdir().unwrap();

        let toml_path = dir.path().join("notes.toml");
        fs::write(&toml_path, "[defaults]\nvelocity = 127\n").unwrap();
        assert_eq!(AppConfig::load(&toml_path).unwrap().defaults.velocity, 127);

        let yaml_path = dir.path().join("notes.yml");
        fs::write(&yaml_path, "defaults:\n  velocity: 10\n").unwrap();
        assert_eq!(AppConfig::load(&yaml_path).unwrap().defaults.velocity, 10);
    }

    #[test]
    fn test_load_invalid_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[defaults\nchannel = ").unwrap();

        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Toml { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = AppConfig::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_unknown_backend_in_file() {
        assert!(AppConfig::from_toml("[output]\nbackend = \"speaker\"\n").is_err());
    }

    #[test]
    fn test_backend_override() {
        let mut config = AppConfig::default();
        config.apply_backend_override("null").unwrap();
        assert_eq!(config.output.backend, Backend::Null);

        let err = config.apply_backend_override("loud").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBackend(ref name) if name == "loud"));
        assert_eq!(config.output.backend, Backend::Null);
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let explicit = PathBuf::from("/somewhere/else.toml");
        assert_eq!(config_path(Some(explicit.clone())), Some(explicit));
    }
}
