//! Typed listing record shared by every wizard step

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::wizard::Classification;

/// Street address and coordinates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
pub struct Location {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Land registry data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
pub struct Cadastre {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub built_surface_m2: Option<f64>,
    #[serde(default)]
    pub year_built: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
pub struct Layout {
    #[serde(default)]
    pub bedrooms: Option<u8>,
    #[serde(default)]
    pub bathrooms: Option<u8>,
    /// Floor label as shown on the listing ("ground", "3", "penthouse")
    #[serde(default)]
    pub floor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
pub struct Features {
    #[serde(default)]
    pub elevator: Option<bool>,
    #[serde(default)]
    pub terrace: Option<bool>,
    #[serde(default)]
    pub pool: Option<bool>,
    #[serde(default)]
    pub garage: Option<bool>,
    #[serde(default)]
    pub storage_room: Option<bool>,
    #[serde(default)]
    pub air_conditioning: Option<bool>,
}

/// Energy performance certificate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
pub struct Energy {
    /// Letter grade, A to G
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub consumption_kwh_m2: Option<f64>,
    #[serde(default)]
    pub emissions_kg_m2: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
pub struct Surfaces {
    #[serde(default)]
    pub usable_m2: Option<f64>,
    #[serde(default)]
    pub plot_m2: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
pub struct Building {
    #[serde(default)]
    pub floors: Option<u8>,
    /// Monthly community fees
    #[serde(default)]
    pub community_fees: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
pub struct Condition {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub orientation: Option<String>,
}

/// Commercial operation of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    #[default]
    Sale,
    Rent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
pub struct Pricing {
    #[serde(default)]
    pub operation: Option<Operation>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub negotiable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
pub struct Description {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// The full listing record edited by the wizard.
///
/// Each step owns one section; sections stay `None` until the step's page
/// writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
pub struct ListingForm {
    pub id: Uuid,
    #[ts(type = "string")]
    #[schema(value_type = String)]
    pub classification: Classification,
    /// 1-based: highest completed step + 1
    pub form_position: usize,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub cadastre: Option<Cadastre>,
    #[serde(default)]
    pub layout: Option<Layout>,
    #[serde(default)]
    pub features: Option<Features>,
    #[serde(default)]
    pub energy: Option<Energy>,
    #[serde(default)]
    pub surfaces: Option<Surfaces>,
    #[serde(default)]
    pub building: Option<Building>,
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub pricing: Option<Pricing>,
    #[serde(default)]
    pub description: Option<Description>,
}

impl ListingForm {
    /// A fresh listing positioned on the first step
    pub fn new(classification: Classification) -> Self {
        Self::with_id(Uuid::new_v4(), classification)
    }

    pub fn with_id(id: Uuid, classification: Classification) -> Self {
        Self {
            id,
            classification,
            form_position: 1,
            updated_at: Utc::now(),
            location: None,
            cadastre: None,
            layout: None,
            features: None,
            energy: None,
            surfaces: None,
            building: None,
            condition: None,
            pricing: None,
            description: None,
        }
    }

    /// Whether the section owned by `step_id` has been written
    pub fn has_section(&self, step_id: &str) -> bool {
        match step_id {
            "property_type" => true,
            "location" => self.location.is_some(),
            "cadastre" => self.cadastre.is_some(),
            "layout" => self.layout.is_some(),
            "features" => self.features.is_some(),
            "energy" => self.energy.is_some(),
            "surfaces" => self.surfaces.is_some(),
            "building" => self.building.is_some(),
            "condition" => self.condition.is_some(),
            "pricing" => self.pricing.is_some(),
            "description" => self.description.is_some(),
            _ => false,
        }
    }

    /// Apply a partial update. Returns false when the patch was empty.
    pub fn apply(&mut self, patch: ListingPatch) -> bool {
        if patch.is_empty() {
            return false;
        }

        let ListingPatch {
            classification,
            form_position,
            location,
            cadastre,
            layout,
            features,
            energy,
            surfaces,
            building,
            condition,
            pricing,
            description,
        } = patch;

        if let Some(classification) = classification {
            self.classification = classification;
        }
        if let Some(form_position) = form_position {
            self.form_position = form_position;
        }
        replace_if_some(&mut self.location, location);
        replace_if_some(&mut self.cadastre, cadastre);
        replace_if_some(&mut self.layout, layout);
        replace_if_some(&mut self.features, features);
        replace_if_some(&mut self.energy, energy);
        replace_if_some(&mut self.surfaces, surfaces);
        replace_if_some(&mut self.building, building);
        replace_if_some(&mut self.condition, condition);
        replace_if_some(&mut self.pricing, pricing);
        replace_if_some(&mut self.description, description);

        self.updated_at = Utc::now();
        true
    }
}

fn replace_if_some<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Partial listing update. Present sections replace the stored ones whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
pub struct ListingPatch {
    #[serde(default)]
    #[ts(type = "string | null")]
    #[schema(value_type = Option<String>)]
    pub classification: Option<Classification>,
    #[serde(default)]
    pub form_position: Option<usize>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub cadastre: Option<Cadastre>,
    #[serde(default)]
    pub layout: Option<Layout>,
    #[serde(default)]
    pub features: Option<Features>,
    #[serde(default)]
    pub energy: Option<Energy>,
    #[serde(default)]
    pub surfaces: Option<Surfaces>,
    #[serde(default)]
    pub building: Option<Building>,
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub pricing: Option<Pricing>,
    #[serde(default)]
    pub description: Option<Description>,
}

impl ListingPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn classification(classification: Classification) -> Self {
        Self {
            classification: Some(classification),
            ..Self::default()
        }
    }

    pub fn form_position(form_position: usize) -> Self {
        Self {
            form_position: Some(form_position),
            ..Self::default()
        }
    }
}
