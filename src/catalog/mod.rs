//! Catalog of placeable virtual elements.
//!
//! The catalog is a static JSON description of categories, each holding an
//! ordered list of element definitions. It is parsed and validated once at
//! startup, inserted as an immutable resource, and shared read-only by the
//! placement tool for the lifetime of the process. A malformed catalog is
//! unrecoverable: the app reports the error and exits before any session
//! starts, since defaulting the catalog would leave nothing to place.

use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Whether an element is a free-standing object or a floor texture set
/// assigned to a detected plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Object,
    Floor,
}

/// One placeable element. Immutable after catalog load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDefinition {
    pub model_name: String,
    pub display_name: String,
    /// Per-sub-node scale factors for particle effects carried by the model.
    #[serde(default)]
    pub particle_scale_info: HashMap<String, f32>,
    pub element_type: ElementKind,
}

/// Ordered group of elements presented together. Load order is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub category: String,
    pub objects: Vec<ElementDefinition>,
}

impl Category {
    /// A floor category holds nothing but floor texture sets.
    pub fn is_floor(&self) -> bool {
        !self.objects.is_empty()
            && self
                .objects
                .iter()
                .all(|object| object.element_type == ElementKind::Floor)
    }
}

/// Loaded-once catalog resource. Nothing mutates it after startup.
#[derive(Resource, Debug, Clone)]
pub struct ElementCatalog {
    categories: Vec<Category>,
}

impl ElementCatalog {
    /// Parse a catalog from its JSON description. Fails on any malformed
    /// entry, including a duplicate model name within one category.
    /// Duplicates across categories are fine; floor texture sets and
    /// objects may legitimately share a source model.
    pub fn from_json(source: &str) -> Result<Self, CatalogError> {
        let categories: Vec<Category> = serde_json::from_str(source)?;

        for category in &categories {
            let mut seen = HashSet::new();
            for object in &category.objects {
                if !seen.insert(object.model_name.as_str()) {
                    return Err(CatalogError::DuplicateModel {
                        model: object.model_name.clone(),
                        category: category.category.clone(),
                    });
                }
            }
        }

        Ok(Self { categories })
    }

    /// Read and parse the catalog file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// Categories in load order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    /// Elements of a named category, in load order.
    pub fn objects_in(&self, category: &str) -> Option<&[ElementDefinition]> {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.objects.as_slice())
    }
}
