//! Step catalog for the listing wizard

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a catalog is misconfigured
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("step catalog is empty")]
    Empty,

    #[error("duplicate step id '{0}'")]
    DuplicateId(String),

    #[error("step at index {0} has an empty id")]
    BlankId(usize),
}

/// A single wizard step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Stable identifier used for rendering and lookup
    pub id: String,
    /// Display label
    pub title: String,
}

impl Step {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// The step definitions of the listing wizard, in display order
pub const LISTING_STEPS: &[(&str, &str)] = &[
    ("property_type", "Property type"),
    ("location", "Location"),
    ("cadastre", "Cadastral data"),
    ("layout", "Rooms and layout"),
    ("features", "Features and amenities"),
    ("energy", "Energy certificate"),
    ("surfaces", "Surfaces"),
    ("building", "Building and community"),
    ("condition", "Condition and orientation"),
    ("pricing", "Price and conditions"),
    ("description", "Description and publish"),
];

/// Ordered, immutable list of steps. Identity for navigation is the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCatalog {
    steps: Vec<Step>,
}

impl StepCatalog {
    /// Build a catalog, rejecting empty lists and blank or duplicate ids
    pub fn new(steps: Vec<Step>) -> Result<Self, CatalogError> {
        if steps.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for (i, step) in steps.iter().enumerate() {
            if step.id.trim().is_empty() {
                return Err(CatalogError::BlankId(i));
            }
            if !seen.insert(step.id.as_str()) {
                return Err(CatalogError::DuplicateId(step.id.clone()));
            }
        }

        Ok(Self { steps })
    }

    /// The built-in listing catalog
    pub fn listing() -> Self {
        Self {
            steps: LISTING_STEPS
                .iter()
                .map(|(id, title)| Step::new(*id, *title))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a constructed catalog
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl Default for StepCatalog {
    fn default() -> Self {
        Self::listing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_catalog_has_eleven_steps() {
        let catalog = StepCatalog::listing();
        assert_eq!(catalog.len(), 11);
        assert_eq!(catalog.last_index(), 10);
        assert_eq!(catalog.get(0).unwrap().id, "property_type");
        assert_eq!(catalog.get(10).unwrap().id, "description");
        assert!(catalog.get(11).is_none());
    }

    #[test]
    fn test_listing_catalog_passes_construction_checks() {
        let catalog = StepCatalog::listing();
        assert_eq!(StepCatalog::new(catalog.steps().to_vec()), Ok(catalog));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert_eq!(StepCatalog::new(vec![]), Err(CatalogError::Empty));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = StepCatalog::new(vec![Step::new("a", "A"), Step::new("a", "Again")]);
        assert_eq!(result, Err(CatalogError::DuplicateId("a".to_string())));
    }

    #[test]
    fn test_blank_id_rejected() {
        let result = StepCatalog::new(vec![Step::new("a", "A"), Step::new("  ", "Blank")]);
        assert_eq!(result, Err(CatalogError::BlankId(1)));
    }

    #[test]
    fn test_position_lookup() {
        let catalog = StepCatalog::listing();
        assert_eq!(catalog.position("pricing"), Some(9));
        assert_eq!(catalog.position("missing"), None);
    }
}
