//! In-memory port fakes shared by the unit tests of this crate.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use scriptenv_domain::device::{Device, DeviceGroup, Hub, Location};
use scriptenv_domain::error::ScriptEnvError;
use scriptenv_domain::id::{DeviceGroupId, DeviceId};
use scriptenv_domain::identity::UserToken;
use scriptenv_domain::taxonomy::TaxonomySnapshot;
use scriptenv_domain::time::{after_secs, now};

use crate::ports::{DeviceRepository, IdentityProvider};

/// Two device types: a thermometer measuring inside-air temperature and a
/// lamp with a brightness input and an event-only status service.
pub fn sample_snapshot() -> TaxonomySnapshot {
    serde_json::from_value(serde_json::json!({
        "aspects": [
            {"id": "air", "name": "Air", "sub_aspects": [
                {"id": "inside_air", "name": "Inside Air"}
            ]},
            {"id": "device", "name": "Device"}
        ],
        "functions": [
            {"id": "getTemperature", "name": "Get Temperature", "concept_id": "temperature",
             "rdf_type": "https://senergy.infai.org/ontology/MeasuringFunction"},
            {"id": "setBrightness", "name": "Set Brightness",
             "rdf_type": "https://senergy.infai.org/ontology/ControllingFunction"}
        ],
        "device_classes": [
            {"id": "thermometer", "name": "Thermometer"},
            {"id": "lamp", "name": "Lamp"}
        ],
        "concepts": [
            {"id": "temperature", "name": "Temperature",
             "characteristic_ids": ["celsius"], "base_characteristic_id": "celsius"}
        ],
        "characteristics": [
            {"id": "celsius", "name": "Celsius", "type": "https://schema.org/Float"}
        ],
        "device_types": [
            {"id": "dt_thermo", "name": "Thermo", "device_class_id": "thermometer", "services": [
                {"id": "s_temp", "name": "temperature", "interaction": "request", "outputs": [
                    {"id": "c1", "content_variable": {"id": "v", "name": "value", "sub_content_variables": [
                        {"id": "v.t", "name": "temperature", "characteristic_id": "celsius",
                         "function_id": "getTemperature", "aspect_id": "inside_air",
                         "type": "https://schema.org/Float"}
                    ]}}
                ]}
            ]},
            {"id": "dt_lamp", "name": "Lamp", "device_class_id": "lamp", "services": [
                {"id": "s_bright", "name": "brightness", "interaction": "request", "inputs": [
                    {"id": "c2", "content_variable": {"id": "b", "name": "brightness",
                     "characteristic_id": "percent", "function_id": "setBrightness",
                     "aspect_id": "device", "type": "https://schema.org/Integer"}}
                ]},
                {"id": "s_status", "name": "status", "interaction": "event"}
            ]}
        ]
    }))
    .unwrap()
}

fn device(id: &str, local_id: &str, device_type_id: &str) -> Device {
    Device {
        id: DeviceId::from(id),
        local_id: local_id.to_string(),
        name: id.to_string(),
        device_type_id: device_type_id.into(),
        ..Device::default()
    }
}

/// Repository fake serving [`sample_snapshot`] and a fixed set of records.
pub struct InMemoryRepository {
    snapshot: Option<TaxonomySnapshot>,
    devices: Vec<Device>,
    groups: HashMap<DeviceGroupId, DeviceGroup>,
    hubs: HashMap<String, Hub>,
    locations: HashMap<String, Location>,
    loads: AtomicUsize,
    tokens: Mutex<Vec<String>>,
}

impl InMemoryRepository {
    pub fn new(snapshot: TaxonomySnapshot) -> Self {
        let devices = vec![
            device("d_thermo", "thermo-1", "dt_thermo"),
            device("d_lamp", "lamp-1", "dt_lamp"),
        ];
        let group = DeviceGroup {
            id: DeviceGroupId::from("g1"),
            name: "all".to_string(),
            device_ids: devices.iter().map(|d| d.id.clone()).collect(),
            ..DeviceGroup::default()
        };
        let hub = Hub {
            id: "h1".to_string(),
            name: "hub".to_string(),
            device_ids: vec![DeviceId::from("d_lamp")],
            device_local_ids: vec!["lamp-1".to_string()],
            ..Hub::default()
        };
        let location = Location {
            id: "l1".to_string(),
            name: "kitchen".to_string(),
            device_ids: vec![DeviceId::from("d_lamp")],
            ..Location::default()
        };
        Self {
            snapshot: Some(snapshot),
            devices,
            groups: HashMap::from([(group.id.clone(), group)]),
            hubs: HashMap::from([(hub.id.clone(), hub)]),
            locations: HashMap::from([(location.id.clone(), location)]),
            loads: AtomicUsize::new(0),
            tokens: Mutex::new(Vec::new()),
        }
    }

    /// A repository whose every call fails.
    pub fn unavailable() -> Self {
        Self {
            snapshot: None,
            ..Self::new(TaxonomySnapshot::default())
        }
    }

    pub fn taxonomy_loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Tokens passed to per-user reads, in call order.
    pub fn seen_tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    fn answer<T: Send>(
        &self,
        token: &str,
        value: Option<T>,
    ) -> impl Future<Output = Result<Option<T>, ScriptEnvError>> + Send {
        self.tokens.lock().unwrap().push(token.to_string());
        let result = if self.snapshot.is_some() {
            Ok(value)
        } else {
            Err(ScriptEnvError::unavailable("connection refused"))
        };
        async { result }
    }
}

impl DeviceRepository for InMemoryRepository {
    fn load_taxonomy(
        &self,
    ) -> impl Future<Output = Result<TaxonomySnapshot, ScriptEnvError>> + Send {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let result = self
            .snapshot
            .clone()
            .ok_or_else(|| ScriptEnvError::unavailable("connection refused"));
        async { result }
    }

    fn read_device(
        &self,
        id: &DeviceId,
        token: &str,
    ) -> impl Future<Output = Result<Option<Device>, ScriptEnvError>> + Send {
        let found = self.devices.iter().find(|d| d.id == *id).cloned();
        self.answer(token, found)
    }

    fn read_device_by_local_id(
        &self,
        local_id: &str,
        token: &str,
    ) -> impl Future<Output = Result<Option<Device>, ScriptEnvError>> + Send {
        let found = self.devices.iter().find(|d| d.local_id == local_id).cloned();
        self.answer(token, found)
    }

    fn read_hub(
        &self,
        id: &str,
        token: &str,
    ) -> impl Future<Output = Result<Option<Hub>, ScriptEnvError>> + Send {
        self.answer(token, self.hubs.get(id).cloned())
    }

    fn read_device_group(
        &self,
        id: &DeviceGroupId,
        token: &str,
    ) -> impl Future<Output = Result<Option<DeviceGroup>, ScriptEnvError>> + Send {
        self.answer(token, self.groups.get(id).cloned())
    }

    fn read_location(
        &self,
        id: &str,
        token: &str,
    ) -> impl Future<Output = Result<Option<Location>, ScriptEnvError>> + Send {
        self.answer(token, self.locations.get(id).cloned())
    }
}

/// Identity fake issuing `token-<n>` tokens valid for `ttl_secs`.
pub struct CountingIdentity {
    ttl_secs: u64,
    issued: AtomicUsize,
}

impl CountingIdentity {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl_secs,
            issued: AtomicUsize::new(0),
        }
    }

    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }
}

impl IdentityProvider for CountingIdentity {
    fn exchange_user_token(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<UserToken, ScriptEnvError>> + Send {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let token = UserToken {
            token: format!("token-{n}-{user_id}"),
            expires_at: after_secs(now(), self.ttl_secs),
        };
        async { Ok(token) }
    }
}
