//! The on-disk fixture document.

use std::path::Path;

use serde::{Deserialize, Serialize};

use scriptenv_domain::device::{Device, DeviceGroup, Hub, Location};
use scriptenv_domain::taxonomy::TaxonomySnapshot;

use crate::error::FixtureError;

/// Everything a [`FixtureRepository`](crate::FixtureRepository) serves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub taxonomy: TaxonomySnapshot,
    pub devices: Vec<Device>,
    pub device_groups: Vec<DeviceGroup>,
    pub hubs: Vec<Hub>,
    pub locations: Vec<Location>,
}

impl Fixture {
    /// # Errors
    ///
    /// Returns [`FixtureError::Decode`] when `raw` is not a fixture document.
    pub fn from_json(raw: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// # Errors
    ///
    /// Returns [`FixtureError::Read`] when the file cannot be read and
    /// [`FixtureError::Decode`] when it is not a fixture document.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let fixture = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            device_types = fixture.taxonomy.device_types.len(),
            devices = fixture.devices.len(),
            "fixture loaded"
        );
        Ok(fixture)
    }
}
