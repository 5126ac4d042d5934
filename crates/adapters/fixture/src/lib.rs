//! # scriptenv-adapter-fixture
//!
//! Driven adapter serving the `DeviceRepository` and `IdentityProvider`
//! ports from a JSON fixture instead of a remote device repository.
//!
//! ## Fixture format
//!
//! One JSON document with a `taxonomy` snapshot (aspects, functions, device
//! classes, concepts, characteristics, device types) and the per-user
//! records (`devices`, `device_groups`, `hubs`, `locations`). Every field is
//! optional.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `scriptenv-app` and `scriptenv-domain`.

mod error;
mod fixture;
mod identity;
mod repository;

pub use error::FixtureError;
pub use fixture::Fixture;
pub use identity::StaticIdentity;
pub use repository::FixtureRepository;
