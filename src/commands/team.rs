/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::*;
use crate::input::*;
use clap::Subcommand;
use connector::*;

#[derive(Subcommand, Debug)]
pub enum Commands {
    List,
    Create {
        #[arg(short, long)]
        name: Option<String>,
    },
}

pub async fn handle(config: &RequestConfig, cmd: Commands) -> CommandResult {
    match cmd {
        Commands::List => {
            let res = teams::get_teams(config).await?;

            if res.is_empty() {
                println!("No teams.");
            } else {
                for team in res {
                    println!("{}: {}", team.name, team.id);
                }
            }
        }

        Commands::Create { name } => {
            require_admin(config)?;
            let name = or_ask(name, "Name")?;

            match teams::post_team(config, name.clone()).await {
                Ok(team) => println!("Team {} created ({}).", team.name, team.id),
                Err(e) if e.is_conflict() => {
                    return Err(CommandError::Input(format!(
                        "Team \"{}\" already exists.",
                        name
                    )));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
