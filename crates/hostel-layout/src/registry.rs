//! Layout registry
//!
//! The LayoutRegistry maps `(facility, floor)` to an immutable FloorLayout.
//! It is assembled through [`RegistryBuilder`], which validates every floor
//! before it is admitted, and never changes afterwards.

use crate::catalog::CatalogFile;
use crate::error::{LayoutError, LayoutNotFound, Result};
use hostel_types::{FacilityId, FacilityMeta, FloorLayout, LayoutNode, ValidationError};
use std::collections::BTreeMap;

/// One facility and its floors
#[derive(Debug, Clone)]
pub struct FacilityEntry {
    pub meta: FacilityMeta,
    floors: BTreeMap<u32, FloorLayout>,
}

impl FacilityEntry {
    fn new(meta: FacilityMeta) -> Self {
        Self {
            meta,
            floors: BTreeMap::new(),
        }
    }

    /// Floor numbers in ascending order
    pub fn floor_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.floors.keys().copied()
    }

    pub fn floor(&self, number: u32) -> Option<&FloorLayout> {
        self.floors.get(&number)
    }

    pub fn floors(&self) -> impl Iterator<Item = (u32, &FloorLayout)> {
        self.floors.iter().map(|(n, l)| (*n, l))
    }
}

/// Read-only catalog of floor layouts
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    facilities: BTreeMap<FacilityId, FacilityEntry>,
}

impl LayoutRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Resolve the layout of one floor
    pub fn resolve(
        &self,
        facility: &str,
        floor: u32,
    ) -> std::result::Result<&FloorLayout, LayoutNotFound> {
        let entry = self.facility(facility)?;
        entry.floor(floor).ok_or_else(|| LayoutNotFound::Floor {
            facility: entry.meta.id.clone(),
            floor,
        })
    }

    /// Look up a facility by id
    pub fn facility(&self, facility: &str) -> std::result::Result<&FacilityEntry, LayoutNotFound> {
        self.facilities
            .get(facility)
            .ok_or_else(|| LayoutNotFound::Facility(FacilityId::new(facility)))
    }

    /// Look up a facility by its short code, ignoring case
    pub fn facility_by_code(&self, code: &str) -> Option<&FacilityEntry> {
        self.facilities.values().find(|e| e.meta.matches_code(code))
    }

    /// All facility metadata, ordered by id
    pub fn facilities(&self) -> impl Iterator<Item = &FacilityMeta> {
        self.facilities.values().map(|e| &e.meta)
    }

    /// All facilities with their floors, ordered by id
    pub fn entries(&self) -> impl Iterator<Item = &FacilityEntry> {
        self.facilities.values()
    }

    /// Floor numbers of a facility in ascending order
    pub fn floors(&self, facility: &str) -> std::result::Result<Vec<u32>, LayoutNotFound> {
        Ok(self.facility(facility)?.floor_numbers().collect())
    }

    /// Resolve a room node; `None` when the floor exists but has no such room
    pub fn room_node(
        &self,
        facility: &str,
        floor: u32,
        room_id: &str,
    ) -> std::result::Result<Option<&LayoutNode>, LayoutNotFound> {
        Ok(self.resolve(facility, floor)?.room_node(room_id))
    }

    pub fn facility_count(&self) -> usize {
        self.facilities.len()
    }

    pub fn floor_count(&self) -> usize {
        self.facilities.values().map(|e| e.floors.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}

/// Validating builder for [`LayoutRegistry`]
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    facilities: BTreeMap<FacilityId, FacilityEntry>,
}

impl RegistryBuilder {
    /// Declare a facility. Ids and short codes must be unique.
    pub fn facility(mut self, meta: FacilityMeta) -> Result<Self> {
        self.declare(meta)?;
        Ok(self)
    }

    /// Add one validated floor to a declared facility
    pub fn floor(mut self, facility: &FacilityId, number: u32, layout: FloorLayout) -> Result<Self> {
        self.insert_floor(facility, number, layout)?;
        Ok(self)
    }

    /// Merge a catalog. A facility already declared with identical metadata
    /// receives the catalog's floors; differing metadata is a conflict.
    pub fn catalog(mut self, catalog: CatalogFile) -> Result<Self> {
        for facility in catalog.facilities {
            let meta = facility.meta();
            match self.facilities.get(&meta.id) {
                Some(existing) if existing.meta == meta => {}
                Some(_) => return Err(LayoutError::FacilityAlreadyExists(meta.id)),
                None => self.declare(meta.clone())?,
            }
            for (number, layout) in facility.floors {
                self.insert_floor(&meta.id, number, layout)?;
            }
        }
        Ok(self)
    }

    pub fn build(self) -> LayoutRegistry {
        tracing::debug!(
            facilities = self.facilities.len(),
            floors = self.facilities.values().map(|e| e.floors.len()).sum::<usize>(),
            "Built layout registry"
        );
        LayoutRegistry {
            facilities: self.facilities,
        }
    }

    fn declare(&mut self, meta: FacilityMeta) -> Result<()> {
        if meta.id.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyField("id").into());
        }
        if meta.code.trim().is_empty() {
            return Err(ValidationError::EmptyField("code").into());
        }
        if self.facilities.contains_key(&meta.id) {
            return Err(LayoutError::FacilityAlreadyExists(meta.id));
        }
        if let Some(existing) = self.facilities.values().find(|e| e.meta.matches_code(&meta.code)) {
            return Err(LayoutError::DuplicateFacilityCode {
                code: meta.code,
                existing: existing.meta.id.clone(),
            });
        }
        self.facilities.insert(meta.id.clone(), FacilityEntry::new(meta));
        Ok(())
    }

    fn insert_floor(&mut self, facility: &FacilityId, number: u32, layout: FloorLayout) -> Result<()> {
        let entry = self
            .facilities
            .get_mut(facility)
            .ok_or_else(|| LayoutError::UndeclaredFacility {
                facility: facility.clone(),
                floor: number,
            })?;

        layout.validate().map_err(|source| LayoutError::InvalidLayout {
            facility: facility.clone(),
            floor: number,
            source,
        })?;

        if entry.floors.contains_key(&number) {
            return Err(LayoutError::FloorAlreadyExists {
                facility: facility.clone(),
                floor: number,
            });
        }

        entry.floors.insert(number, layout);
        Ok(())
    }
}
