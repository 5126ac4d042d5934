//! Application services — the script namespaces.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod device_repo_service;
pub mod inputs_service;
pub mod outputs_service;
pub mod session;
pub mod util_service;
pub mod variables_service;
