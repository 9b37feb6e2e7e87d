//! Listing record and the store step pages edit it through

pub mod form;
pub mod store;

pub use form::{
    Building, Cadastre, Condition, Description, Energy, Features, Layout, ListingForm,
    ListingPatch, Location, Operation, Pricing, Surfaces,
};
pub use store::{FormDataStore, InMemoryFormStore};
