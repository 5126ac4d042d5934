//! Subcommand handlers. Each returns the JSON document printed to stdout.

use anyhow::Context;
use serde_json::Value;

use scriptenv_adapter_fixture::{FixtureRepository, StaticIdentity};
use scriptenv_app::instance_variables::InstanceVariables;
use scriptenv_app::script_env::ScriptEnv;
use scriptenv_domain::criteria::{FilterCriteria, MatchMode};
use scriptenv_domain::listing::DeviceTypeListQuery;
use scriptenv_domain::selectable::SelectableQuery;

use crate::cli::{
    Command, CriteriaArgs, ExpandArgs, ListDeviceTypesArgs, MeasuringFunctionsArgs,
    SelectablesArgs, TemplateArgs,
};

pub type Env = ScriptEnv<FixtureRepository, StaticIdentity, InstanceVariables>;

/// Variables a command seeds the task's store with.
pub fn initial_variables(command: &Command) -> anyhow::Result<InstanceVariables> {
    let Command::Template(args) = command else {
        return Ok(InstanceVariables::default());
    };
    let vars = args
        .vars
        .iter()
        .map(|pair| {
            let (name, raw) = pair
                .split_once('=')
                .with_context(|| format!("expected NAME=VALUE, got {pair:?}"))?;
            let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
            Ok((name.to_string(), value))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(InstanceVariables::new(vars))
}

pub async fn dispatch(command: Command, env: &Env) -> anyhow::Result<Value> {
    tracing::debug!(?command, "dispatching command");
    match command {
        Command::Selectables(args) => selectables(args, env).await,
        Command::MeasuringFunctions(args) => measuring_functions(args, env).await,
        Command::Template(args) => template(&args, env),
        Command::Expand(args) => expand(args, env).await,
        Command::ListDeviceTypes(args) => list_device_types(args, env).await,
    }
}

fn parse_criteria(args: &CriteriaArgs) -> anyhow::Result<Vec<FilterCriteria>> {
    serde_json::from_str(&args.criteria).context("criteria must be a JSON array of filter criteria")
}

async fn selectables(args: SelectablesArgs, env: &Env) -> anyhow::Result<Value> {
    let query = SelectableQuery::new(parse_criteria(&args.criteria)?)
        .path_prefix(args.prefix)
        .include_modified(args.include_modified)
        .mode(MatchMode::from_must_match_all(args.all));
    let selectables = env.device_repo().device_type_selectables(&query).await?;
    Ok(serde_json::to_value(selectables)?)
}

async fn measuring_functions(args: MeasuringFunctionsArgs, env: &Env) -> anyhow::Result<Value> {
    let functions = env
        .device_repo()
        .aspect_node_measuring_functions(&args.aspect_id.into(), args.ancestors, args.descendants)
        .await?;
    Ok(serde_json::to_value(functions)?)
}

fn template(args: &TemplateArgs, env: &Env) -> anyhow::Result<Value> {
    Ok(Value::String(env.variables().deref_template(&args.template)?))
}

async fn expand(args: ExpandArgs, env: &Env) -> anyhow::Result<Value> {
    let criteria = parse_criteria(&args.criteria)?;
    let options = env
        .util()
        .get_devices_with_service_from_entity_string(&args.option, &criteria)
        .await?;
    Ok(serde_json::to_value(options)?)
}

async fn list_device_types(args: ListDeviceTypesArgs, env: &Env) -> anyhow::Result<Value> {
    let query = DeviceTypeListQuery {
        limit: args.limit,
        offset: args.offset,
        sort: args.sort.parse()?,
        criteria: parse_criteria(&args.criteria)?,
        include_modified: args.include_modified,
        include_unmodified: !args.exclude_unmodified,
    };
    let device_types = env.device_repo().list_device_types(&query).await?;
    Ok(serde_json::to_value(device_types)?)
}
