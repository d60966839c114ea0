//! NazoratHub command-line application: configuration, logging, wiring and
//! the commands that drive [`nh_app::AppController`].

pub mod adapters;
pub mod bootstrap;
pub mod commands;

use std::sync::Arc;

use anyhow::{Context, Result};
use nh_core::ports::ConfirmationPort;

use adapters::{AssumeYes, StdinConfirmation};
use bootstrap::{build_controller, resolve_config, AppPaths};
use commands::Cli;

/// Entry point behind `main`: resolves configuration, wires the controller,
/// loads the working set and runs the requested command.
pub async fn run_cli(cli: Cli) -> Result<()> {
    let paths = AppPaths::system()?;
    if let Err(err) = bootstrap::tracing::init_tracing_subscriber(&paths.logs_dir) {
        eprintln!("Failed to initialize tracing: {err}");
    }

    let config = resolve_config(cli.config.as_deref(), &paths, |name| std::env::var(name).ok())?;

    let confirmation: Arc<dyn ConfirmationPort> = if cli.yes {
        Arc::new(AssumeYes)
    } else {
        Arc::new(StdinConfirmation)
    };

    let mut controller = build_controller(&config, confirmation).await?;
    controller.load().await.context("failed to load workspace")?;

    commands::run(cli.command, &mut controller).await
}
