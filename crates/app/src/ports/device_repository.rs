//! Device repository port — the taxonomy snapshot and per-user record reads.

use std::future::Future;

use scriptenv_domain::device::{Device, DeviceGroup, Hub, Location};
use scriptenv_domain::error::ScriptEnvError;
use scriptenv_domain::id::{DeviceGroupId, DeviceId};
use scriptenv_domain::taxonomy::TaxonomySnapshot;

/// Read access to the device repository.
///
/// Per-user reads take the caller's access token and return `Ok(None)` when
/// the record does not exist (or is not visible to that user). Transport
/// failures are reported as [`ScriptEnvError::RepositoryUnavailable`].
pub trait DeviceRepository: Send + Sync {
    /// Everything needed to build a [`TaxonomyIndex`](scriptenv_domain::taxonomy::TaxonomyIndex).
    fn load_taxonomy(
        &self,
    ) -> impl Future<Output = Result<TaxonomySnapshot, ScriptEnvError>> + Send;

    fn read_device(
        &self,
        id: &DeviceId,
        token: &str,
    ) -> impl Future<Output = Result<Option<Device>, ScriptEnvError>> + Send;

    fn read_device_by_local_id(
        &self,
        local_id: &str,
        token: &str,
    ) -> impl Future<Output = Result<Option<Device>, ScriptEnvError>> + Send;

    fn read_hub(
        &self,
        id: &str,
        token: &str,
    ) -> impl Future<Output = Result<Option<Hub>, ScriptEnvError>> + Send;

    fn read_device_group(
        &self,
        id: &DeviceGroupId,
        token: &str,
    ) -> impl Future<Output = Result<Option<DeviceGroup>, ScriptEnvError>> + Send;

    fn read_location(
        &self,
        id: &str,
        token: &str,
    ) -> impl Future<Output = Result<Option<Location>, ScriptEnvError>> + Send;
}

impl<T: DeviceRepository> DeviceRepository for std::sync::Arc<T> {
    fn load_taxonomy(
        &self,
    ) -> impl Future<Output = Result<TaxonomySnapshot, ScriptEnvError>> + Send {
        (**self).load_taxonomy()
    }

    fn read_device(
        &self,
        id: &DeviceId,
        token: &str,
    ) -> impl Future<Output = Result<Option<Device>, ScriptEnvError>> + Send {
        (**self).read_device(id, token)
    }

    fn read_device_by_local_id(
        &self,
        local_id: &str,
        token: &str,
    ) -> impl Future<Output = Result<Option<Device>, ScriptEnvError>> + Send {
        (**self).read_device_by_local_id(local_id, token)
    }

    fn read_hub(
        &self,
        id: &str,
        token: &str,
    ) -> impl Future<Output = Result<Option<Hub>, ScriptEnvError>> + Send {
        (**self).read_hub(id, token)
    }

    fn read_device_group(
        &self,
        id: &DeviceGroupId,
        token: &str,
    ) -> impl Future<Output = Result<Option<DeviceGroup>, ScriptEnvError>> + Send {
        (**self).read_device_group(id, token)
    }

    fn read_location(
        &self,
        id: &str,
        token: &str,
    ) -> impl Future<Output = Result<Option<Location>, ScriptEnvError>> + Send {
        (**self).read_location(id, token)
    }
}
