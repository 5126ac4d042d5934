//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod device_repository;
pub mod identity;
pub mod variable_store;

pub use device_repository::DeviceRepository;
pub use identity::IdentityProvider;
pub use variable_store::VariableStore;
