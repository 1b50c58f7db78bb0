use std::path::PathBuf;

/// Submit resources to a control plane and wait for them to converge
#[derive(clap::Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct ConvergeCli {
    #[command(subcommand)]
    pub command: ConvergeCommands,
    #[clap(flatten)]
    pub global: GlobalArgs,
}

#[derive(clap::Subcommand, Clone, Debug)]
pub enum ConvergeCommands {
    /// Create the resources described in a manifest
    #[clap(aliases = &["a"])]
    Apply {
        #[clap(flatten)]
        opt: ApplyOperation,
    },
    /// Wait for an existing resource to report its condition
    #[clap(aliases = &["w"])]
    Wait {
        #[clap(flatten)]
        opt: WaitOperation,
    },
    /// Install a chart through a Flux HelmRepository and HelmRelease
    #[clap(aliases = &["hr"])]
    HelmRelease {
        #[clap(flatten)]
        opt: HelmReleaseOperation,
    },
}

#[derive(clap::Args, Clone, Debug)]
pub struct ApplyOperation {
    /// Manifest file (YAML or JSON, multiple YAML documents allowed)
    #[arg(short, long)]
    pub file: PathBuf,
    /// Wait for the last resource in the manifest to become ready
    #[arg(long)]
    pub wait: bool,
    /// Treat resources that already exist as submitted
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub adopt_existing: bool,
}

#[derive(clap::Args, Clone, Debug)]
pub struct WaitOperation {
    /// Resource kind, e.g. `HelmRelease`
    #[arg(short, long)]
    pub kind: String,
    /// Resource name
    #[arg(short = 'N', long)]
    pub name: String,
}

#[derive(clap::Args, Clone, Debug)]
pub struct HelmReleaseOperation {
    /// HelmRepository name
    #[arg(long, default_value = "bitnami")]
    pub repo_name: String,
    /// Chart repository URL
    #[arg(long, default_value = "https://charts.bitnami.com/bitnami")]
    pub repo_url: String,
    /// HelmRelease name, also used as the Helm release name
    #[arg(long, default_value = "nginx")]
    pub release_name: String,
    /// Chart to install
    #[arg(long, default_value = "nginx")]
    pub chart: String,
    /// Chart version constraint
    #[arg(long, default_value = "8.x")]
    pub chart_version: String,
    /// Helm values as a JSON object
    #[arg(long, default_value = r#"{"service":{"type":"ClusterIP"}}"#)]
    pub values: String,
}

/// Flags shared by every command. Unset values fall back to the
/// `OPRC_CONVERGE_*` environment.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Namespace of the resources
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,
    /// Seconds between status fetches
    #[arg(long, global = true)]
    pub interval: Option<u64>,
    /// Seconds to wait before giving up
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
    /// Condition type that signals readiness
    #[arg(long, global = true)]
    pub condition: Option<String>,
    /// Stop waiting early when the condition is False with this reason
    #[arg(long, global = true)]
    pub fail_on_reason: Vec<String>,
    /// Run against an in-process control plane instead of a cluster
    #[arg(long, global = true)]
    pub memory: bool,
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,
}

/// Available output formats
#[derive(clap::ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}
