/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

mod commands;
mod config;
mod input;

use clap::Parser;
use commands::base::{Cli, run_cli};
use config::*;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = load_config()
            .ok()
            .and_then(|config| get_value(&config, ConfigKey::LogLevel))
            .unwrap_or_else(|| "warn".to_string());
        EnvFilter::new(level)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
pub async fn main() -> std::io::Result<()> {
    init_logging();
    run_cli(Cli::parse()).await
}
