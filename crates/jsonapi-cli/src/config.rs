//! CLI configuration file

use anyhow::{Context, Result};
use jsonapi_encoder::EncoderConfig;
use jsonapi_schema::{RegistryDefinition, SchemaContainer, SchemaDefinition};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// `[encoder]` table plus `[[schemas]]` array
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
    pub(crate) encoder: EncoderConfig,
    pub(crate) schemas: Vec<SchemaDefinition>,
}

impl CliConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config = Self::parse(&raw).with_context(|| format!("parsing {}", path.display()))?;
        debug!(path = %path.display(), schemas = config.schemas.len(), "Loaded config");
        Ok(config)
    }

    pub(crate) fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub(crate) fn container(&self) -> Result<SchemaContainer> {
        let registry = RegistryDefinition {
            schemas: self.schemas.clone(),
        };
        SchemaContainer::from_definitions(registry).context("invalid schema registry")
    }
}
