use bevy::prelude::*;

use crate::catalog::{ElementCatalog, ElementDefinition, ElementKind};

/// What selecting an element means for the interaction that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementAction {
    /// Spawn the object at the current focus position.
    PlaceObject,
    /// Arm floor assignment; the next plane tap receives the material.
    AwaitFloorAssignment,
}

/// Tracks which category and element the user is working with, and whether
/// a floor texture assignment is pending a plane tap.
#[derive(Resource, Debug, Default, PartialEq)]
pub struct SelectionState {
    category: Option<usize>,
    pending_floor: Option<String>,
}

impl SelectionState {
    /// Selecting a category clears any pending floor assignment, unless the
    /// selected category is itself the floor category.
    pub fn select_category(&mut self, index: usize, catalog: &ElementCatalog) {
        self.category = Some(index);
        let is_floor = catalog.category(index).is_some_and(|c| c.is_floor());
        if !is_floor {
            self.pending_floor = None;
        }
    }

    /// Selecting a floor element arms the pending assignment and drops the
    /// category display; selecting an object leaves the category alone.
    pub fn select_element(&mut self, definition: &ElementDefinition) -> ElementAction {
        match definition.element_type {
            ElementKind::Object => ElementAction::PlaceObject,
            ElementKind::Floor => {
                self.pending_floor = Some(definition.model_name.clone());
                self.category = None;
                ElementAction::AwaitFloorAssignment
            }
        }
    }

    /// Consume the pending floor name when a plane is tapped.
    pub fn take_pending_floor(&mut self) -> Option<String> {
        self.pending_floor.take()
    }

    pub fn category(&self) -> Option<usize> {
        self.category
    }

    pub fn pending_floor(&self) -> Option<&str> {
        self.pending_floor.as_deref()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
