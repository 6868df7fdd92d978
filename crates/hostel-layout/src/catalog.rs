//! Layout catalogs
//!
//! A catalog is a JSON document listing facilities and, optionally, the
//! geometry of their floors:
//!
//! ```json
//! { "facilities": [
//!     { "id": "hostelG", "code": "G", "name": "Hostel G", "type": "girls",
//!       "floors": { "0": { "frame": {...}, "nodes": [...] } } }
//! ] }
//! ```
//!
//! The built-in catalog is compiled into the binary; deployments can add
//! further catalog files at startup.

use crate::error::{LayoutError, Result};
use crate::registry::LayoutRegistry;
use hostel_types::{FacilityId, FacilityKind, FacilityMeta, FloorLayout};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../catalog/builtin.json");

/// A parsed catalog document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub facilities: Vec<CatalogFacility>,
}

/// One facility entry of a catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFacility {
    pub id: FacilityId,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FacilityKind,
    #[serde(default)]
    pub floors: BTreeMap<u32, FloorLayout>,
}

impl CatalogFacility {
    pub fn meta(&self) -> FacilityMeta {
        FacilityMeta {
            id: self.id.clone(),
            code: self.code.clone(),
            name: self.name.clone(),
            kind: self.kind,
        }
    }
}

impl CatalogFile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// The catalog shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }
}

impl LayoutRegistry {
    /// Registry holding only the built-in catalog
    pub fn builtin() -> Result<Self> {
        Ok(Self::builder().catalog(CatalogFile::builtin()?)?.build())
    }

    /// Registry from an optional built-in catalog plus extra catalog files
    pub fn load<P: AsRef<Path>>(include_builtin: bool, extra: &[P]) -> Result<Self> {
        let mut builder = Self::builder();
        if include_builtin {
            builder = builder.catalog(CatalogFile::builtin()?)?;
        }
        for path in extra {
            tracing::info!(path = %path.as_ref().display(), "Loading layout catalog");
            builder = builder.catalog(CatalogFile::load(path)?)?;
        }
        Ok(builder.build())
    }
}
