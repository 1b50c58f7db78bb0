use std::process;

use clap::Parser;
use envconfig::Envconfig;
use oprc_converge::CancellationToken;
use oprc_converge_cli::{ConvergeCli, ConvergeConfig, init_tracing};
use tracing::{info, level_filters::LevelFilter, warn};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    init_tracing(LevelFilter::WARN);
    let cli = ConvergeCli::parse();

    let config = match ConvergeConfig::init_from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            process::exit(2);
        }
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("interrupt received, stopping");
                    cancel.cancel();
                }
                Err(e) => warn!(error = %e, "cannot listen for ctrl-c"),
            }
        });
    }

    if let Err(e) = oprc_converge_cli::run(cli, config, cancel).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
