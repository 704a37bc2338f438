use clap::Parser;
use clashgen::catalog::default_catalog;
use clashgen::error::{GenError, Result};
use clashgen::generate::{generate, RunSummary};
use clashgen::template::ConfigTemplate;
use clashgen::users::load_users;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod args;
use args::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(summary) if summary.is_success() => {
            info!(
                "generated Clash subscriptions for {} users",
                summary.succeeded
            );
        }
        Ok(summary) => {
            error!(
                "completed with {} failure(s); generated {} of {} users",
                summary.failed,
                summary.succeeded,
                summary.attempted()
            );
            std::process::exit(1);
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<RunSummary> {
    let users = load_users(&cli.users_path)?;
    if users.is_empty() {
        return Err(GenError::EmptyUserStore(cli.users_path));
    }

    let template = ConfigTemplate::load(&cli.template_path)?;
    let catalog = default_catalog();

    Ok(generate(
        &users,
        &template,
        &catalog,
        &cli.sni_host,
        &cli.output_dir,
    ))
}
