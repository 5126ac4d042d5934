//! `util` namespace — identity, IoT-option classification and expansion.

use std::collections::BTreeMap;
use std::sync::Arc;

use scriptenv_domain::criteria::{FilterCriteria, MatchMode};
use scriptenv_domain::error::ScriptEnvError;
use scriptenv_domain::iot_option::{self, IotOption};
use scriptenv_domain::selectable::SelectableQuery;

use super::device_repo_service::DeviceRepoService;
use super::session::UserSession;
use crate::ports::{DeviceRepository, IdentityProvider};

/// Application service behind the `util` namespace.
pub struct UtilService<R, I> {
    session: Arc<UserSession<I>>,
    devices: Arc<DeviceRepoService<R, I>>,
}

impl<R: DeviceRepository, I: IdentityProvider> UtilService<R, I> {
    pub fn new(session: Arc<UserSession<I>>, devices: Arc<DeviceRepoService<R, I>>) -> Self {
        Self { session, devices }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        self.session.user_id()
    }

    /// # Errors
    ///
    /// Propagates failures of the identity provider.
    pub async fn user_token(&self) -> Result<String, ScriptEnvError> {
        self.session.user_token().await
    }

    #[must_use]
    pub fn is_device_iot_option(&self, option: &IotOption) -> bool {
        option.is_device()
    }

    #[must_use]
    pub fn is_device_group_iot_option(&self, option: &IotOption) -> bool {
        option.is_device_group()
    }

    #[must_use]
    pub fn is_import_iot_option(&self, option: &IotOption) -> bool {
        option.is_import()
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::MalformedInput`] when `raw` does not decode.
    pub fn is_device_iot_option_str(&self, raw: &str) -> Result<bool, ScriptEnvError> {
        Ok(IotOption::decode(raw)?.is_device())
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::MalformedInput`] when `raw` does not decode.
    pub fn is_device_group_iot_option_str(&self, raw: &str) -> Result<bool, ScriptEnvError> {
        Ok(IotOption::decode(raw)?.is_device_group())
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::MalformedInput`] when `raw` does not decode.
    pub fn is_import_iot_option_str(&self, raw: &str) -> Result<bool, ScriptEnvError> {
        Ok(IotOption::decode(raw)?.is_import())
    }

    #[must_use]
    pub fn group_iot_options_by_device(
        &self,
        options: &[IotOption],
    ) -> BTreeMap<String, Vec<IotOption>> {
        iot_option::group_by_device(options)
    }

    #[must_use]
    pub fn group_iot_options_by_service(
        &self,
        options: &[IotOption],
    ) -> BTreeMap<String, Vec<IotOption>> {
        iot_option::group_by_service(options)
    }

    /// Expand a device (or device group) selection into one selection per
    /// service satisfying any of `criteria`.
    ///
    /// A device selection that already names a service is returned as is;
    /// import and generic-event-source selections expand to nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for unknown devices or groups,
    /// or a repository/identity error.
    #[tracing::instrument(skip(self, option, criteria), fields(criteria = criteria.len()))]
    pub async fn get_devices_with_service_from_iot_option(
        &self,
        option: &IotOption,
        criteria: &[FilterCriteria],
    ) -> Result<Vec<IotOption>, ScriptEnvError> {
        let device_ids = match option {
            IotOption::Device(selection) if selection.service_id.is_some() => {
                return Ok(vec![option.clone()]);
            }
            IotOption::Device(selection) => vec![selection.device_id.clone()],
            IotOption::DeviceGroup(selection) => {
                self.devices.read_device_group(&selection.id).await?.device_ids
            }
            IotOption::Import(_) | IotOption::GenericEventSource(_) | IotOption::Unrecognized => {
                return Ok(Vec::new());
            }
        };
        let query = SelectableQuery::new(criteria.to_vec())
            .include_modified(true)
            .mode(MatchMode::Any);
        let selectables = self.devices.device_type_selectables(&query).await?;
        let mut expanded = Vec::new();
        for device_id in &device_ids {
            let device = self.devices.read_device(device_id).await?;
            expanded.extend(iot_option::expand_device(&device, &selectables));
        }
        tracing::debug!(devices = device_ids.len(), options = expanded.len(), "iot option expanded");
        Ok(expanded)
    }

    /// [`get_devices_with_service_from_iot_option`](Self::get_devices_with_service_from_iot_option)
    /// on the serialized form of an option.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::MalformedInput`] when `raw` does not decode,
    /// then as the decoded variant.
    pub async fn get_devices_with_service_from_entity_string(
        &self,
        raw: &str,
        criteria: &[FilterCriteria],
    ) -> Result<Vec<IotOption>, ScriptEnvError> {
        let option = IotOption::decode(raw)?;
        self.get_devices_with_service_from_iot_option(&option, criteria)
            .await
    }
}
