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
    Create {
        #[arg(short, long)]
        name: Option<String>,
        /// Team name or ID
        #[arg(short, long)]
        team: Option<String>,
        #[arg(short, long, default_value = "user")]
        role: String,
    },
}

pub async fn handle(config: &RequestConfig, cmd: Commands) -> CommandResult {
    match cmd {
        Commands::Create { name, team, role } => {
            require_admin(config)?;

            let role = role
                .parse::<Role>()
                .map_err(|_| format!("Invalid role \"{}\", expected admin or user.", role))?;
            let name = or_ask(name, "Name")?;
            let team = or_ask(team, "Team")?;
            let password = ask_for_password()?;

            let teams = teams::get_teams(config).await?;
            let team_id = teams
                .iter()
                .find(|candidate| candidate.name == team || candidate.id == team)
                .map(|found| found.id.clone())
                .ok_or_else(|| format!("Team \"{}\" not found.", team))?;

            match users::post_user(config, name.clone(), password, role, team_id).await {
                Ok(user) => println!("User {} created ({}).", user.name, user.id),
                Err(e) if e.is_conflict() => {
                    return Err(CommandError::Input(format!(
                        "User \"{}\" already exists.",
                        name
                    )));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
