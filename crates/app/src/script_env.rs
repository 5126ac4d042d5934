//! One task's script environment: the five namespaces wired to shared ports.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::ports::{DeviceRepository, IdentityProvider, VariableStore};
use crate::services::device_repo_service::DeviceRepoService;
use crate::services::inputs_service::InputsService;
use crate::services::outputs_service::OutputsService;
use crate::services::session::UserSession;
use crate::services::util_service::UtilService;
use crate::services::variables_service::VariablesService;
use crate::taxonomy_cache::TaxonomyCache;

/// What a finished task hands back to the worker.
#[derive(Debug)]
pub struct TaskResults<S> {
    pub outputs: BTreeMap<String, Value>,
    /// The variable store, including the writes made during the task.
    pub variables: S,
}

/// The namespaces a script sees: `deviceRepo`, `util`, `inputs`, `outputs`
/// and `variables`.
///
/// This is the whole capability surface injected into a script; the host
/// exposes these accessors and nothing else.
///
/// The taxonomy cache is shared across tasks; everything else is scoped to
/// this one task.
pub struct ScriptEnv<R, I, S> {
    device_repo: Arc<DeviceRepoService<R, I>>,
    util: UtilService<R, I>,
    inputs: InputsService,
    outputs: OutputsService,
    variables: VariablesService<S>,
}

impl<R, I, S> ScriptEnv<R, I, S>
where
    R: DeviceRepository,
    I: IdentityProvider,
    S: VariableStore,
{
    pub fn device_repo(&self) -> &DeviceRepoService<R, I> {
        &self.device_repo
    }

    pub fn util(&self) -> &UtilService<R, I> {
        &self.util
    }

    pub fn inputs(&self) -> &InputsService {
        &self.inputs
    }

    pub fn outputs(&self) -> &OutputsService {
        &self.outputs
    }

    pub fn outputs_mut(&mut self) -> &mut OutputsService {
        &mut self.outputs
    }

    pub fn variables(&self) -> &VariablesService<S> {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut VariablesService<S> {
        &mut self.variables
    }

    pub fn into_results(self) -> TaskResults<S> {
        TaskResults {
            outputs: self.outputs.into_outputs(),
            variables: self.variables.into_store(),
        }
    }
}

/// Builder for [`ScriptEnv`].
pub struct ScriptEnvBuilder<R, I> {
    cache: Arc<TaxonomyCache<R>>,
    identity: I,
    user_id: String,
    inputs: BTreeMap<String, Value>,
}

impl<R: DeviceRepository, I: IdentityProvider> ScriptEnvBuilder<R, I> {
    #[must_use]
    pub fn new(cache: Arc<TaxonomyCache<R>>, identity: I) -> Self {
        Self {
            cache,
            identity,
            user_id: String::new(),
            inputs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    #[must_use]
    pub fn inputs(mut self, inputs: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.inputs.extend(inputs);
        self
    }

    pub fn build<S: VariableStore>(self, variables: S) -> ScriptEnv<R, I, S> {
        let session = Arc::new(UserSession::new(self.user_id, self.identity));
        let device_repo = Arc::new(DeviceRepoService::new(self.cache, Arc::clone(&session)));
        ScriptEnv {
            util: UtilService::new(session, Arc::clone(&device_repo)),
            device_repo,
            inputs: InputsService::new(self.inputs),
            outputs: OutputsService::new(),
            variables: VariablesService::new(variables),
        }
    }
}
