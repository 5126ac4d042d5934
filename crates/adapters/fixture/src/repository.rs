//! [`DeviceRepository`] over a loaded [`Fixture`].

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;

use scriptenv_app::ports::DeviceRepository;
use scriptenv_domain::device::{Device, DeviceGroup, Hub, Location};
use scriptenv_domain::error::ScriptEnvError;
use scriptenv_domain::id::{DeviceGroupId, DeviceId};
use scriptenv_domain::taxonomy::TaxonomySnapshot;

use crate::error::FixtureError;
use crate::fixture::Fixture;

/// Read-only device repository backed by a fixture document.
///
/// Later records win when the fixture repeats an id.
pub struct FixtureRepository {
    taxonomy: TaxonomySnapshot,
    devices: HashMap<DeviceId, Device>,
    device_local_ids: HashMap<String, DeviceId>,
    device_groups: HashMap<DeviceGroupId, DeviceGroup>,
    hubs: HashMap<String, Hub>,
    locations: HashMap<String, Location>,
}

impl FixtureRepository {
    #[must_use]
    pub fn new(fixture: Fixture) -> Self {
        let device_local_ids = fixture
            .devices
            .iter()
            .filter(|d| !d.local_id.is_empty())
            .map(|d| (d.local_id.clone(), d.id.clone()))
            .collect();
        Self {
            taxonomy: fixture.taxonomy,
            devices: fixture
                .devices
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect(),
            device_local_ids,
            device_groups: fixture
                .device_groups
                .into_iter()
                .map(|g| (g.id.clone(), g))
                .collect(),
            hubs: fixture.hubs.into_iter().map(|h| (h.id.clone(), h)).collect(),
            locations: fixture
                .locations
                .into_iter()
                .map(|l| (l.id.clone(), l))
                .collect(),
        }
    }

    /// # Errors
    ///
    /// See [`Fixture::load`].
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        Ok(Self::new(Fixture::load(path)?))
    }

    fn authorized<T>(token: &str, record: Option<&T>) -> Result<Option<T>, ScriptEnvError>
    where
        T: Clone,
    {
        if token.is_empty() {
            return Err(FixtureError::MissingToken.into());
        }
        Ok(record.cloned())
    }
}

impl DeviceRepository for FixtureRepository {
    fn load_taxonomy(
        &self,
    ) -> impl Future<Output = Result<TaxonomySnapshot, ScriptEnvError>> + Send {
        let snapshot = self.taxonomy.clone();
        async move { Ok(snapshot) }
    }

    fn read_device(
        &self,
        id: &DeviceId,
        token: &str,
    ) -> impl Future<Output = Result<Option<Device>, ScriptEnvError>> + Send {
        let result = Self::authorized(token, self.devices.get(id));
        async move { result }
    }

    fn read_device_by_local_id(
        &self,
        local_id: &str,
        token: &str,
    ) -> impl Future<Output = Result<Option<Device>, ScriptEnvError>> + Send {
        let device = self
            .device_local_ids
            .get(local_id)
            .and_then(|id| self.devices.get(id));
        let result = Self::authorized(token, device);
        async move { result }
    }

    fn read_hub(
        &self,
        id: &str,
        token: &str,
    ) -> impl Future<Output = Result<Option<Hub>, ScriptEnvError>> + Send {
        let result = Self::authorized(token, self.hubs.get(id));
        async move { result }
    }

    fn read_device_group(
        &self,
        id: &DeviceGroupId,
        token: &str,
    ) -> impl Future<Output = Result<Option<DeviceGroup>, ScriptEnvError>> + Send {
        let result = Self::authorized(token, self.device_groups.get(id));
        async move { result }
    }

    fn read_location(
        &self,
        id: &str,
        token: &str,
    ) -> impl Future<Output = Result<Option<Location>, ScriptEnvError>> + Send {
        let result = Self::authorized(token, self.locations.get(id));
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptenv_domain::error::ErrorKind;

    fn make_repository() -> FixtureRepository {
        FixtureRepository::new(
            Fixture::from_json(
                r#"{
                    "taxonomy": {"device_classes": [{"id": "lamp", "name": "Lamp"}]},
                    "devices": [
                        {"id": "d1", "local_id": "lamp-1", "device_type_id": "dt_lamp"},
                        {"id": "d2", "device_type_id": "dt_lamp"}
                    ],
                    "device_groups": [{"id": "g1", "device_ids": ["d1", "d2"]}],
                    "locations": [{"id": "l1", "name": "kitchen"}]
                }"#,
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn should_serve_taxonomy_snapshot() {
        let snapshot = make_repository().load_taxonomy().await.unwrap();
        assert_eq!(snapshot.device_classes[0].id.as_str(), "lamp");
    }

    #[tokio::test]
    async fn should_read_device_by_id_and_local_id() {
        let repo = make_repository();
        let by_id = repo.read_device(&"d1".into(), "t").await.unwrap().unwrap();
        let by_local = repo.read_device_by_local_id("lamp-1", "t").await.unwrap().unwrap();
        assert_eq!(by_id, by_local);
        assert!(repo.read_device_by_local_id("", "t").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_return_none_when_record_missing() {
        let repo = make_repository();
        assert!(repo.read_hub("h9", "t").await.unwrap().is_none());
        assert!(repo.read_device_group(&"g9".into(), "t").await.unwrap().is_none());
        assert_eq!(repo.read_location("l1", "t").await.unwrap().unwrap().name, "kitchen");
    }

    #[tokio::test]
    async fn should_reject_reads_without_token() {
        let err = make_repository()
            .read_device(&"d1".into(), "")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RepositoryUnavailable);
    }
}
