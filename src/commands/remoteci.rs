/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::*;
use clap::Subcommand;
use connector::*;

#[derive(Subcommand, Debug)]
pub enum Commands {
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u64,
    },
}

pub async fn handle(config: &RequestConfig, cmd: Commands) -> CommandResult {
    match cmd {
        Commands::List { page } => {
            let res = remotecis::get_remotecis(config, page).await?;

            if res.remotecis.is_empty() {
                println!("No remote CIs.");
            } else {
                for remoteci in &res.remotecis {
                    println!("{}: {}", remoteci.name, remoteci.id);
                }
            }

            println!(
                "Page {}/{} ({} remote CIs)",
                page.max(1),
                res.total_pages(),
                res.total_count
            );
        }
    }

    Ok(())
}
