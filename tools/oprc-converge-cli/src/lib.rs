mod commands;
mod config;
mod flux;
mod manifest;
mod output;
mod types;

pub use commands::Converge;
pub use config::ConvergeConfig;
pub use flux::flux_registry;
pub use output::{Formatter, get_formatter, print_output};
pub use types::{
    ApplyOperation, ConvergeCli, ConvergeCommands, GlobalArgs,
    HelmReleaseOperation, OutputFormat, WaitOperation,
};

use oprc_converge::CancellationToken;
use tracing::debug;
use tracing_subscriber::{
    EnvFilter,
    filter::{Builder, LevelFilter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// `RUST_LOG` when set, `default_level` otherwise.
pub fn init_tracing(default_level: LevelFilter) {
    let filter = filter_builder(default_level).from_env_lossy();
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn filter_builder(default_level: LevelFilter) -> Builder {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("RUST_LOG")
}

pub async fn run(
    cli: ConvergeCli,
    config: ConvergeConfig,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let config = config.with_overrides(&cli.global);
    debug!(?config, "resolved configuration");

    let mut registry = flux_registry();
    let entries = match &cli.command {
        ConvergeCommands::Apply { opt } => {
            let entries = manifest::load(&opt.file)?;
            manifest::extend_registry(&mut registry, &entries);
            entries
        }
        _ => Vec::new(),
    };

    let cv = Converge::connect(config, &cli.global, registry, cancel).await?;
    match &cli.command {
        ConvergeCommands::Apply { opt } => {
            commands::handle_apply_command(&cv, opt, &entries).await
        }
        ConvergeCommands::Wait { opt } => {
            commands::handle_wait_command(&cv, opt).await
        }
        ConvergeCommands::HelmRelease { opt } => {
            commands::handle_helm_release_command(&cv, opt).await
        }
    }
}
