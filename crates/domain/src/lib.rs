//! # scriptenv-domain
//!
//! Pure domain model for the smart-service script environment.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **taxonomy** records (aspects, functions, device classes,
//!   concepts, characteristics) and the precomputed [`TaxonomyIndex`](taxonomy::TaxonomyIndex)
//! - Define **device types** and their services' content-variable trees
//! - Match services against [`FilterCriteria`](criteria::FilterCriteria) and
//!   build [`DeviceTypeSelectable`](selectable::DeviceTypeSelectable) results
//! - Classify and group [`IotOption`](iot_option::IotOption) selections
//! - Parse variable references and render templates
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod criteria;
pub mod device;
pub mod device_type;
pub mod identity;
pub mod iot_option;
pub mod listing;
pub mod reference;
pub mod selectable;
pub mod taxonomy;

#[cfg(test)]
mod testing;
