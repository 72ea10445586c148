// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export configuration: declared unit, document metadata, attribute lookup

use crate::error::AmfResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

/// Attribute key holding the declared unit
pub const ATTR_UNITS: &str = "units";

/// Default config file picked up by [`ExportConfig::load`]
pub const CONFIG_FILE: &str = "polyframe-amf.toml";

/// Linear unit declared on the `<amf>` root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "mm")]
    Millimeter,
    #[default]
    #[serde(rename = "inch")]
    Inch,
    #[serde(rename = "ft")]
    Foot,
    #[serde(rename = "meters")]
    Meter,
    #[serde(rename = "micrometers")]
    Micrometer,
}

impl Unit {
    pub const ALL: [Unit; 5] = [
        Unit::Millimeter,
        Unit::Inch,
        Unit::Foot,
        Unit::Meter,
        Unit::Micrometer,
    ];

    /// Name written to the `unit` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Millimeter => "mm",
            Unit::Inch => "inch",
            Unit::Foot => "ft",
            Unit::Meter => "meters",
            Unit::Micrometer => "micrometers",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized unit name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUnit(pub String);

impl fmt::Display for UnknownUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown unit '{}' (expected mm|inch|ft|meters|micrometers)",
            self.0
        )
    }
}

impl std::error::Error for UnknownUnit {}

impl FromStr for Unit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Unit::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownUnit(s.to_string()))
    }
}

/// String-keyed host configuration lookup
pub trait AttributeLookup {
    fn attribute(&self, key: &str) -> Option<&str>;
}

impl AttributeLookup for HashMap<String, String> {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl AttributeLookup for BTreeMap<String, String> {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// Resolve the declared unit, falling back to [`Unit::default`] when the
/// key is unset or unrecognized.
pub fn resolve_unit<L: AttributeLookup + ?Sized>(lookup: &L) -> Unit {
    match lookup.attribute(ATTR_UNITS) {
        None => Unit::default(),
        Some(value) => value.parse().unwrap_or_else(|err: UnknownUnit| {
            warn!(%err, fallback = %Unit::default(), "falling back to default unit");
            Unit::default()
        }),
    }
}

/// `<metadata type='...'>` kinds understood by AMF consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    Name,
    Description,
    Url,
    Author,
    Company,
    Cad,
    Revision,
}

impl MetadataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataKind::Name => "Name",
            MetadataKind::Description => "Description",
            MetadataKind::Url => "URL",
            MetadataKind::Author => "Author",
            MetadataKind::Company => "Company",
            MetadataKind::Cad => "CAD",
            MetadataKind::Revision => "Revision",
        }
    }
}

/// Descriptive document-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    pub company: String,
    pub url: String,
    pub cad: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub revision: Option<String>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            company: "Polyframe Inc.".to_string(),
            url: "https://polyframe.dev".to_string(),
            cad: format!("Polyframe AMF v{}", env!("CARGO_PKG_VERSION")),
            author: None,
            description: None,
            revision: None,
        }
    }
}

impl DocumentMetadata {
    /// Entries in emission order. Unset optional fields are skipped.
    pub fn entries(&self) -> Vec<(MetadataKind, &str)> {
        let mut entries = vec![
            (MetadataKind::Company, self.company.as_str()),
            (MetadataKind::Url, self.url.as_str()),
            (MetadataKind::Cad, self.cad.as_str()),
        ];
        let optional = [
            (MetadataKind::Author, &self.author),
            (MetadataKind::Description, &self.description),
            (MetadataKind::Revision, &self.revision),
        ];
        for (kind, value) in optional {
            if let Some(value) = value {
                entries.push((kind, value.as_str()));
            }
        }
        entries
    }
}

/// Export configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Host attributes, e.g. `units = "mm"`
    pub attributes: BTreeMap<String, String>,
    /// Id of the single emitted object
    pub object_id: u32,
    pub metadata: DocumentMetadata,
}

impl AttributeLookup for ExportConfig {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.attribute(key)
    }
}

impl ExportConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> AmfResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `polyframe-amf.toml` if present, then apply the `AMF_UNITS`
    /// environment override
    pub fn load() -> AmfResult<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };

        if let Ok(units) = std::env::var("AMF_UNITS") {
            config.attributes.insert(ATTR_UNITS.to_string(), units);
        }

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> AmfResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.set_unit(unit);
        self
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.attributes
            .insert(ATTR_UNITS.to_string(), unit.as_str().to_string());
    }

    pub fn unit(&self) -> Unit {
        resolve_unit(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_unit_names_roundtrip() {
        for unit in Unit::ALL {
            assert_eq!(unit.as_str().parse::<Unit>(), Ok(unit));
        }
        assert_eq!("MM".parse::<Unit>(), Ok(Unit::Millimeter));
    }

    #[test]
    fn test_resolve_unit_defaults_when_unset() {
        let attrs: HashMap<String, String> = HashMap::new();
        assert_eq!(resolve_unit(&attrs), Unit::Inch);
    }

    #[test]
    fn test_resolve_unit_falls_back_on_garbage() {
        let mut attrs = HashMap::new();
        attrs.insert(ATTR_UNITS.to_string(), "furlongs".to_string());
        assert_eq!(resolve_unit(&attrs), Unit::Inch);
    }

    #[test]
    fn test_resolve_unit_reads_attribute() {
        let config = ExportConfig::default().with_unit(Unit::Micrometer);
        assert_eq!(config.unit(), Unit::Micrometer);
    }

    #[test]
    fn test_metadata_entries_skip_unset() {
        let mut metadata = DocumentMetadata::default();
        let kinds: Vec<_> = metadata.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![MetadataKind::Company, MetadataKind::Url, MetadataKind::Cad]
        );

        metadata.revision = Some("B".to_string());
        let entries = metadata.entries();
        assert_eq!(entries.last(), Some(&(MetadataKind::Revision, "B")));
    }

    #[test]
    fn test_config_file_roundtrip() -> anyhow::Result<()> {
        let mut config = ExportConfig::default().with_unit(Unit::Foot);
        config.object_id = 7;
        config.metadata.author = Some("QA".to_string());

        let file = NamedTempFile::new()?;
        config.save(file.path())?;
        let loaded = ExportConfig::from_file(file.path())?;

        assert_eq!(loaded, config);
        assert_eq!(loaded.unit(), Unit::Foot);
        Ok(())
    }

    #[test]
    fn test_partial_config_uses_defaults() -> anyhow::Result<()> {
        let config: ExportConfig = toml::from_str("[attributes]\nunits = \"mm\"\n")?;
        assert_eq!(config.unit(), Unit::Millimeter);
        assert_eq!(config.object_id, 0);
        assert_eq!(config.metadata, DocumentMetadata::default());
        Ok(())
    }
}
