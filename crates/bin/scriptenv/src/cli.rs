//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Run script-environment queries against a device-repository fixture.
#[derive(Debug, Parser)]
#[command(name = "scriptenv", version, about)]
pub struct Cli {
    /// Configuration file (defaults to `scriptenv.toml` when present).
    #[arg(long, global = true, env = "SCRIPTENV_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Device types whose services match the criteria, with matching paths.
    Selectables(SelectablesArgs),
    /// Measuring functions of an aspect node.
    MeasuringFunctions(MeasuringFunctionsArgs),
    /// Render a `{{.name}}` template over the given variables.
    Template(TemplateArgs),
    /// Expand an IoT option into one selection per matching service.
    Expand(ExpandArgs),
    /// Filtered, sorted and paged device types.
    ListDeviceTypes(ListDeviceTypesArgs),
}

/// Filter criteria as a JSON array, e.g. `[{"function_id":"getTemperature"}]`.
#[derive(Debug, Args)]
pub struct CriteriaArgs {
    #[arg(long, default_value = "[]")]
    pub criteria: String,
}

#[derive(Debug, Args)]
pub struct SelectablesArgs {
    #[command(flatten)]
    pub criteria: CriteriaArgs,
    /// Only consider paths under this dotted prefix.
    #[arg(long, default_value = "")]
    pub prefix: String,
    /// Also scan locally modified device types.
    #[arg(long)]
    pub include_modified: bool,
    /// Require every criterion to be satisfied by the service.
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct MeasuringFunctionsArgs {
    pub aspect_id: String,
    #[arg(long)]
    pub ancestors: bool,
    #[arg(long)]
    pub descendants: bool,
}

#[derive(Debug, Args)]
pub struct TemplateArgs {
    pub template: String,
    /// `name=value` pairs; values that are not JSON are taken as strings.
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ExpandArgs {
    /// Serialized IoT option.
    pub option: String,
    #[command(flatten)]
    pub criteria: CriteriaArgs,
}

#[derive(Debug, Args)]
pub struct ListDeviceTypesArgs {
    #[command(flatten)]
    pub criteria: CriteriaArgs,
    /// Maximum number of results, `0` for all.
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
    #[arg(long, default_value_t = 0)]
    pub offset: usize,
    /// `name` or `id`, optionally suffixed with `.asc` or `.desc`.
    #[arg(long, default_value = "name.asc")]
    pub sort: String,
    #[arg(long)]
    pub include_modified: bool,
    #[arg(long)]
    pub exclude_unmodified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn should_pass_clap_debug_assertions() {
        Cli::command().debug_assert();
    }

    #[test]
    fn should_parse_selectables_flags() {
        let cli = Cli::parse_from([
            "scriptenv",
            "selectables",
            "--criteria",
            r#"[{"function_id":"f"}]"#,
            "--prefix",
            "value",
            "--all",
        ]);
        let Command::Selectables(args) = cli.command else {
            panic!("expected selectables");
        };
        assert_eq!(args.prefix, "value");
        assert!(args.all);
        assert!(!args.include_modified);
    }

    #[test]
    fn should_collect_repeated_vars() {
        let cli = Cli::parse_from([
            "scriptenv",
            "--config",
            "other.toml",
            "template",
            "{{.a}}",
            "--var",
            "a=1",
            "--var",
            "b=x",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("other.toml")));
        let Command::Template(args) = cli.command else {
            panic!("expected template");
        };
        assert_eq!(args.vars, ["a=1", "b=x"]);
    }
}
