//! Per-instance storage settings: how blocks of one data instance are compressed and checksummed.
//!
//! Settings arrive as strings, either from a serialized map like `{"Compression": "gzip:7", "Checksum": "crc32"}` or from
//! key/value pairs, and are validated as they are parsed.

use crate::{Checksum, Compression, CompressionFormat, CompressionLevel, Result, StorageError};

use serde::Deserialize;
use std::convert::TryFrom;
use std::str::FromStr;

/// Storage settings of one data instance.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(from = "ConfigUpdate")]
pub struct DataConfig {
    pub compression: Compression,
    pub checksum: Checksum,
    pub versioned: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            compression: Compression::lz4(),
            checksum: Checksum::None,
            versioned: true,
        }
    }
}

impl DataConfig {
    /// Overwrites only the settings present in `update`.
    pub fn modify(&mut self, update: &ConfigUpdate) {
        if let Some(compression) = update.compression {
            self.compression = compression;
        }
        if let Some(checksum) = update.checksum {
            self.checksum = checksum;
        }
        if let Some(versioned) = update.versioned {
            self.versioned = versioned;
        }
    }
}

impl From<ConfigUpdate> for DataConfig {
    fn from(update: ConfigUpdate) -> Self {
        let mut config = Self::default();
        config.modify(&update);

        config
    }
}

/// A partial set of already validated settings.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(try_from = "RawConfigUpdate")]
pub struct ConfigUpdate {
    pub compression: Option<Compression>,
    pub checksum: Option<Checksum>,
    pub versioned: Option<bool>,
}

impl ConfigUpdate {
    /// Parses `(setting, value)` pairs. Setting names are case-insensitive; unrecognized settings are ignored.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut update = Self::default();
        for (key, value) in pairs {
            match key.to_ascii_lowercase().as_str() {
                "compression" => update.compression = Some(value.parse()?),
                "checksum" => update.checksum = Some(value.parse()?),
                "versioned" => update.versioned = Some(parse_bool(value)?),
                _ => tracing::debug!("ignoring unknown data setting {:?}", key),
            }
        }

        Ok(update)
    }
}

#[derive(Deserialize)]
struct RawConfigUpdate {
    #[serde(rename = "Compression", default)]
    compression: Option<String>,
    #[serde(rename = "Checksum", default)]
    checksum: Option<String>,
    #[serde(rename = "Versioned", default)]
    versioned: Option<bool>,
}

impl TryFrom<RawConfigUpdate> for ConfigUpdate {
    type Error = StorageError;

    fn try_from(raw: RawConfigUpdate) -> Result<Self> {
        Ok(Self {
            compression: raw.compression.as_deref().map(str::parse).transpose()?,
            checksum: raw.checksum.as_deref().map(str::parse).transpose()?,
            versioned: raw.versioned,
        })
    }
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(StorageError::InvalidConfig(format!(
            "Illegal boolean setting: {}",
            s
        ))),
    }
}

/// Accepts `none`, `snappy`, `lz4`, `gzip` and `gzip:<level>`, ignoring case.
impl FromStr for Compression {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.to_ascii_lowercase();
        let mut parts = lowered.splitn(2, ':');
        let name = parts.next().unwrap_or_default();
        let level = parts.next();

        match (name, level) {
            ("none", None) => Ok(Compression::none()),
            ("snappy", None) => Ok(Compression::snappy()),
            ("lz4", None) => Ok(Compression::lz4()),
            ("gzip", None) => Compression::gzip(CompressionLevel::DEFAULT),
            ("gzip", Some(level)) => {
                let level: i8 = level.parse().map_err(|_| {
                    StorageError::InvalidConfig(format!("Illegal gzip compression level: {}", s))
                })?;
                Compression::new(CompressionFormat::Gzip, CompressionLevel(level))
            }
            _ => Err(StorageError::InvalidConfig(format!(
                "Illegal compression specified: {}",
                s
            ))),
        }
    }
}

/// Accepts `none` and `crc32`, ignoring case.
impl FromStr for Checksum {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Checksum::None),
            "crc32" => Ok(Checksum::Crc32),
            _ => Err(StorageError::InvalidConfig(format!(
                "Illegal checksum specified: {}",
                s
            ))),
        }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn default_is_versioned_lz4_without_checksum() {
        let config = DataConfig::default();

        assert_eq!(config.compression, Compression::lz4());
        assert_eq!(config.checksum, Checksum::None);
        assert!(config.versioned);
    }

    #[test]
    fn parse_compression_names() {
        assert_eq!("none".parse::<Compression>().unwrap(), Compression::none());
        assert_eq!("Snappy".parse::<Compression>().unwrap(), Compression::snappy());
        assert_eq!("LZ4".parse::<Compression>().unwrap(), Compression::lz4());

        let gzip: Compression = "gzip".parse().unwrap();
        assert_eq!(gzip.format(), CompressionFormat::Gzip);
        assert_eq!(gzip.level(), CompressionLevel::DEFAULT);

        let gzip7: Compression = "gzip:7".parse().unwrap();
        assert_eq!(gzip7.level(), CompressionLevel(7));

        // Level 0 means no compression at all.
        assert_eq!("gzip:0".parse::<Compression>().unwrap(), Compression::none());
    }

    #[test]
    fn reject_bad_compression() {
        assert!(matches!(
            "gzip:fast".parse::<Compression>(),
            Err(StorageError::InvalidConfig(_))
        ));
        assert!(matches!(
            "gzip:10".parse::<Compression>(),
            Err(StorageError::InvalidGzipLevel(10))
        ));
        assert!(matches!(
            "zstd".parse::<Compression>(),
            Err(StorageError::InvalidConfig(msg)) if msg.contains("zstd")
        ));
        assert!("lz4:3".parse::<Compression>().is_err());
    }

    #[test]
    fn parse_checksum_names() {
        assert_eq!("CRC32".parse::<Checksum>().unwrap(), Checksum::Crc32);
        assert_eq!("none".parse::<Checksum>().unwrap(), Checksum::None);
        assert!(matches!(
            "md5".parse::<Checksum>(),
            Err(StorageError::InvalidConfig(_))
        ));
    }

    #[test]
    fn deserialize_partial_map_over_defaults() {
        let config: DataConfig =
            serde_json::from_str(r#"{"Compression": "gzip:3", "Checksum": "crc32"}"#).unwrap();

        assert_eq!(config.compression, Compression::gzip(CompressionLevel(3)).unwrap());
        assert_eq!(config.checksum, Checksum::Crc32);
        assert!(config.versioned);

        let config: DataConfig = serde_json::from_str(r#"{"Versioned": false}"#).unwrap();
        assert_eq!(config.compression, Compression::lz4());
        assert!(!config.versioned);
    }

    #[test]
    fn deserialize_rejects_invalid_settings() {
        assert!(serde_json::from_str::<DataConfig>(r#"{"Compression": "gzip:42"}"#).is_err());
        assert!(serde_json::from_str::<ConfigUpdate>(r#"{"Checksum": "sha1"}"#).is_err());
    }

    #[test]
    fn modify_applies_only_present_settings() {
        let mut config = DataConfig::default();
        let update = ConfigUpdate::from_pairs(vec![("checksum", "crc32"), ("Unknown", "x")]).unwrap();
        config.modify(&update);

        assert_eq!(config.checksum, Checksum::Crc32);
        assert_eq!(config.compression, Compression::lz4());

        let update = ConfigUpdate::from_pairs(vec![("Versioned", "FALSE"), ("Compression", "none")]).unwrap();
        config.modify(&update);
        assert!(!config.versioned);
        assert_eq!(config.compression, Compression::none());
        assert_eq!(config.checksum, Checksum::Crc32);

        assert!(ConfigUpdate::from_pairs(vec![("versioned", "maybe")]).is_err());
    }
}
