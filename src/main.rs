// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use fluxo::backend::Backend;
use fluxo::local_store::LocalStore;
use fluxo::{cli, commands, config};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    if let Some(("local", sub)) = matches.subcommand() {
        return commands::local::handle(&LocalStore::open_default()?, sub);
    }

    let config = config::load_app_configuration().context("Failed to load configuration")?;
    let backend = Backend::connect(&config).context("Failed to open the backend")?;
    let store = backend.store();

    match matches.subcommand() {
        Some(("auth", sub)) => commands::auth::handle(&backend, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(store, config.page_size, sub)?,
        Some(("cards", sub)) => commands::cards::handle(store, sub)?,
        Some(("goals", sub)) => commands::goals::handle(store, sub)?,
        Some(("planned", sub)) => commands::planned::handle(store, sub)?,
        Some(("invest", sub)) => commands::investments::handle(store, sub)?,
        Some(("settings", sub)) => commands::settings::handle(store, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(store, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
