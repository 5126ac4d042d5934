//! # scriptenv-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceRepository` — taxonomy snapshot and per-user device lookups
//!   - `IdentityProvider` — exchange a user id for a short-lived token
//!   - `VariableStore` — named workflow-instance variables
//! - Define the **script namespaces** as service structs:
//!   - `DeviceRepoService`, `UtilService`, `InputsService`,
//!     `OutputsService`, `VariablesService`
//!   - `ScriptEnv` — one task's composition of all five
//! - Provide **in-process infrastructure** that doesn't need IO
//!   (the shared taxonomy cache, the instance-variable store)
//!
//! ## Dependency rule
//! Depends on `scriptenv-domain` only (plus `tokio::sync` for the cache).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod instance_variables;
pub mod ports;
pub mod references;
pub mod script_env;
pub mod services;
pub mod taxonomy_cache;

#[cfg(test)]
mod testing;
