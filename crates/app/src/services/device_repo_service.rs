//! `deviceRepo` namespace — taxonomy lookups, selectables and per-user reads.

use std::sync::Arc;

use scriptenv_domain::device::{Device, DeviceGroup, Hub, Location};
use scriptenv_domain::device_type::{DeviceType, Service};
use scriptenv_domain::error::{NotFoundError, ScriptEnvError};
use scriptenv_domain::id::{
    AspectId, CharacteristicId, ConceptId, DeviceClassId, DeviceGroupId, DeviceId, DeviceTypeId,
    FunctionId, ServiceId,
};
use scriptenv_domain::listing::{DeviceTypeListQuery, list_device_types};
use scriptenv_domain::selectable::{
    DeviceTypeSelectable, SelectableQuery, SkippedDeviceType, device_type_selectables,
};
use scriptenv_domain::taxonomy::{
    Aspect, AspectNode, Characteristic, Concept, ConceptWithCharacteristics, DeviceClass,
    FunctionType, TaxonomyIndex,
};

use super::session::UserSession;
use crate::ports::{DeviceRepository, IdentityProvider};
use crate::taxonomy_cache::TaxonomyCache;

/// Application service behind the `deviceRepo` namespace.
///
/// Taxonomy queries are answered from the shared [`TaxonomyCache`]; device,
/// hub, group and location reads go to the repository with the session's
/// user token.
pub struct DeviceRepoService<R, I> {
    cache: Arc<TaxonomyCache<R>>,
    session: Arc<UserSession<I>>,
}

impl<R: DeviceRepository, I: IdentityProvider> DeviceRepoService<R, I> {
    pub fn new(cache: Arc<TaxonomyCache<R>>, session: Arc<UserSession<I>>) -> Self {
        Self { cache, session }
    }

    async fn index(&self) -> Result<Arc<TaxonomyIndex>, ScriptEnvError> {
        self.cache.index().await
    }

    // ---- aspects ----

    /// Root aspects with their sub-aspect trees.
    ///
    /// # Errors
    ///
    /// Returns an error when the taxonomy cannot be loaded.
    pub async fn aspects(&self) -> Result<Vec<Aspect>, ScriptEnvError> {
        Ok(self.index().await?.aspects())
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn aspect(&self, id: &AspectId) -> Result<Aspect, ScriptEnvError> {
        self.index().await?.aspect(id)
    }

    /// # Errors
    ///
    /// Returns an error when the taxonomy cannot be loaded.
    pub async fn aspect_nodes(&self) -> Result<Vec<AspectNode>, ScriptEnvError> {
        Ok(self.index().await?.aspect_nodes().to_vec())
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn aspect_node(&self, id: &AspectId) -> Result<AspectNode, ScriptEnvError> {
        self.index().await?.aspect_node(id).cloned()
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for the first unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn aspect_nodes_by_ids(
        &self,
        ids: &[AspectId],
    ) -> Result<Vec<AspectNode>, ScriptEnvError> {
        self.index().await?.aspect_nodes_by_ids(ids)
    }

    /// Measuring functions of an aspect node, optionally widened to its
    /// ancestors and descendants.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn aspect_node_measuring_functions(
        &self,
        id: &AspectId,
        ancestors: bool,
        descendants: bool,
    ) -> Result<Vec<FunctionType>, ScriptEnvError> {
        self.index()
            .await?
            .aspect_node_measuring_functions(id, ancestors, descendants)
    }

    /// # Errors
    ///
    /// Returns an error when the taxonomy cannot be loaded.
    pub async fn aspect_nodes_with_measuring_function(
        &self,
        ancestors: bool,
        descendants: bool,
    ) -> Result<Vec<AspectNode>, ScriptEnvError> {
        Ok(self
            .index()
            .await?
            .aspect_nodes_with_measuring_function(ancestors, descendants))
    }

    /// # Errors
    ///
    /// Returns an error when the taxonomy cannot be loaded.
    pub async fn aspects_with_measuring_function(
        &self,
        ancestors: bool,
        descendants: bool,
    ) -> Result<Vec<Aspect>, ScriptEnvError> {
        Ok(self
            .index()
            .await?
            .aspects_with_measuring_function(ancestors, descendants))
    }

    // ---- functions & device classes ----

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn function(&self, id: &FunctionId) -> Result<FunctionType, ScriptEnvError> {
        self.index().await?.function(id).cloned()
    }

    /// # Errors
    ///
    /// Returns an error when the taxonomy cannot be loaded.
    pub async fn functions_by_type(&self, rdf_type: &str) -> Result<Vec<FunctionType>, ScriptEnvError> {
        Ok(self.index().await?.functions_by_type(rdf_type))
    }

    /// # Errors
    ///
    /// Returns an error when the taxonomy cannot be loaded.
    pub async fn device_classes(&self) -> Result<Vec<DeviceClass>, ScriptEnvError> {
        Ok(self.index().await?.device_classes().to_vec())
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn device_class(&self, id: &DeviceClassId) -> Result<DeviceClass, ScriptEnvError> {
        self.index().await?.device_class(id).cloned()
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown device class.
    #[tracing::instrument(skip(self))]
    pub async fn device_class_functions(
        &self,
        id: &DeviceClassId,
    ) -> Result<Vec<FunctionType>, ScriptEnvError> {
        self.index().await?.device_class_functions(id)
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown device class.
    #[tracing::instrument(skip(self))]
    pub async fn device_class_controlling_functions(
        &self,
        id: &DeviceClassId,
    ) -> Result<Vec<FunctionType>, ScriptEnvError> {
        self.index().await?.device_class_controlling_functions(id)
    }

    /// # Errors
    ///
    /// Returns an error when the taxonomy cannot be loaded.
    pub async fn device_classes_with_controlling_functions(
        &self,
    ) -> Result<Vec<DeviceClass>, ScriptEnvError> {
        Ok(self.index().await?.device_classes_with_controlling_functions())
    }

    // ---- characteristics & concepts ----

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn characteristic(
        &self,
        id: &CharacteristicId,
    ) -> Result<Characteristic, ScriptEnvError> {
        self.index().await?.characteristic(id).cloned()
    }

    /// # Errors
    ///
    /// Returns an error when the taxonomy cannot be loaded.
    pub async fn leaf_characteristics(&self) -> Result<Vec<Characteristic>, ScriptEnvError> {
        Ok(self.index().await?.leaf_characteristics())
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn concept_with_characteristics(
        &self,
        id: &ConceptId,
    ) -> Result<ConceptWithCharacteristics, ScriptEnvError> {
        self.index().await?.concept_with_characteristics(id)
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn concept_without_characteristics(
        &self,
        id: &ConceptId,
    ) -> Result<Concept, ScriptEnvError> {
        self.index().await?.concept(id).cloned()
    }

    // ---- device types ----

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn read_device_type(&self, id: &DeviceTypeId) -> Result<DeviceType, ScriptEnvError> {
        self.index().await?.device_type(id).cloned()
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn service(&self, id: &ServiceId) -> Result<Service, ScriptEnvError> {
        self.index().await?.service(id).cloned()
    }

    /// Device types referencing an unknown function or aspect are left out
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Propagates failures to build the taxonomy index.
    #[tracing::instrument(skip(self, query), fields(criteria = query.criteria.len()))]
    pub async fn list_device_types(
        &self,
        query: &DeviceTypeListQuery,
    ) -> Result<Vec<DeviceType>, ScriptEnvError> {
        let selection = list_device_types(&*self.index().await?, query);
        warn_skipped(&selection.skipped);
        Ok(selection.matched)
    }

    /// Device types whose services satisfy the query, with the matching
    /// content-variable paths. Device types referencing an unknown function
    /// or aspect are left out with a warning.
    ///
    /// # Errors
    ///
    /// Propagates failures to build the taxonomy index.
    #[tracing::instrument(
        skip(self, query),
        fields(criteria = query.criteria.len(), prefix = %query.path_prefix)
    )]
    pub async fn device_type_selectables(
        &self,
        query: &SelectableQuery,
    ) -> Result<Vec<DeviceTypeSelectable>, ScriptEnvError> {
        let selection = device_type_selectables(&*self.index().await?, query);
        warn_skipped(&selection.skipped);
        tracing::debug!(count = selection.matched.len(), "selectables computed");
        Ok(selection.matched)
    }

    // ---- per-user reads ----

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] when the device does not exist,
    /// or a repository/identity error.
    #[tracing::instrument(skip(self))]
    pub async fn read_device(&self, id: &DeviceId) -> Result<Device, ScriptEnvError> {
        let token = self.session.user_token().await?;
        self.cache
            .repository()
            .read_device(id, &token)
            .await?
            .ok_or_else(|| NotFoundError::new("Device", id).into())
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] when no device has the local id,
    /// or a repository/identity error.
    #[tracing::instrument(skip(self))]
    pub async fn read_device_by_local_id(&self, local_id: &str) -> Result<Device, ScriptEnvError> {
        let token = self.session.user_token().await?;
        self.cache
            .repository()
            .read_device_by_local_id(local_id, &token)
            .await?
            .ok_or_else(|| NotFoundError::new("Device", local_id).into())
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] when the hub does not exist,
    /// or a repository/identity error.
    #[tracing::instrument(skip(self))]
    pub async fn read_hub(&self, id: &str) -> Result<Hub, ScriptEnvError> {
        let token = self.session.user_token().await?;
        self.cache
            .repository()
            .read_hub(id, &token)
            .await?
            .ok_or_else(|| NotFoundError::new("Hub", id).into())
    }

    /// Device ids (or local ids) connected to a hub.
    ///
    /// # Errors
    ///
    /// See [`read_hub`](Self::read_hub).
    pub async fn list_hub_device_ids(
        &self,
        id: &str,
        as_local_id: bool,
    ) -> Result<Vec<String>, ScriptEnvError> {
        let hub = self.read_hub(id).await?;
        if as_local_id {
            return Ok(hub.device_local_ids);
        }
        Ok(hub.device_ids.iter().map(ToString::to_string).collect())
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] when the group does not exist,
    /// or a repository/identity error.
    #[tracing::instrument(skip(self))]
    pub async fn read_device_group(&self, id: &DeviceGroupId) -> Result<DeviceGroup, ScriptEnvError> {
        let token = self.session.user_token().await?;
        self.cache
            .repository()
            .read_device_group(id, &token)
            .await?
            .ok_or_else(|| NotFoundError::new("DeviceGroup", id).into())
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] when the location does not exist,
    /// or a repository/identity error.
    #[tracing::instrument(skip(self))]
    pub async fn location(&self, id: &str) -> Result<Location, ScriptEnvError> {
        let token = self.session.user_token().await?;
        self.cache
            .repository()
            .read_location(id, &token)
            .await?
            .ok_or_else(|| NotFoundError::new("Location", id).into())
    }
}

fn warn_skipped(skipped: &[SkippedDeviceType]) {
    for entry in skipped {
        tracing::warn!(
            device_type_id = %entry.device_type_id,
            error = %entry.error,
            "device type skipped"
        );
    }
}
