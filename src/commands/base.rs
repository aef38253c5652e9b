/*
 * spdx-filecopyrighttext: 2025 wavelens ug <info@wavelens.io>
 *
 * spdx-license-identifier: agpl-3.0-only
 */

use super::*;
use crate::config::*;
use crate::input::*;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use connector::*;
use std::io;
use std::process::exit;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "DCI Browser", display_name = "DCI Browser", bin_name = "dcibrowser", author = "Wavelens", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    cmd: Option<MainCommands>,
    #[arg(long, value_enum)]
    generate_completions: Option<Shell>,
    /// Overrides the configured server URL
    #[arg(long, global = true, env = "DCI_SERVER")]
    server: Option<String>,
}

#[derive(Subcommand, Debug)]
enum MainCommands {
    Config {
        key: String,
        value: Option<String>,
    },
    Status,
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },
    Logout,
    Info,
    Job {
        #[command(subcommand)]
        cmd: job::Commands,
    },
    Jobdefinition {
        #[command(subcommand)]
        cmd: jobdefinition::Commands,
    },
    Remoteci {
        #[command(subcommand)]
        cmd: remoteci::Commands,
    },
    Team {
        #[command(subcommand)]
        cmd: team::Commands,
    },
    User {
        #[command(subcommand)]
        cmd: user::Commands,
    },
}

fn request_config(server: Option<String>) -> RequestConfig {
    get_request_config(server).unwrap_or_else(|e| {
        eprintln!("{}", e);
        exit(1);
    })
}

/// Prints the failure. A rejected credential sends the user back to `login`.
fn report(config: &RequestConfig, err: CommandError) -> ! {
    match err {
        CommandError::Api(e) if e.is_unauthorized() || config.session.is_unauthorized() => {
            eprintln!("{}", e);
            eprintln!("Not logged in or session expired. Use `dcibrowser login` to log in.");
        }
        CommandError::Api(e) => eprintln!("{}", e),
        CommandError::Input(e) => eprintln!("{}", e),
    }

    exit(1);
}

pub async fn run_cli(cli: Cli) -> std::io::Result<()> {
    if let Some(shell) = cli.generate_completions {
        let mut app = Cli::command();
        let bin_name = app.get_name().to_string();
        generate(shell, &mut app, bin_name, &mut io::stdout());
        return Ok(());
    }

    let Some(cmd) = cli.cmd else {
        Cli::command().print_help()?;
        exit(1);
    };

    if let MainCommands::Config { key, value } = cmd {
        if set_get_value_from_string(key, value, false).is_err() {
            exit(1);
        }

        return Ok(());
    }

    if let MainCommands::Login { username } = cmd {
        login(cli.server, username).await;
        return Ok(());
    }

    let config = request_config(cli.server);
    debug!(command = ?cmd, server = %config.server_url, "Dispatching command");

    let res = match cmd {
        MainCommands::Status => status(&config),
        MainCommands::Logout => auth::logout(&config)
            .map(|_| println!("Logged out."))
            .map_err(CommandError::from),
        MainCommands::Info => info(&config).await,
        MainCommands::Job { cmd } => job::handle(&config, cmd).await,
        MainCommands::Jobdefinition { cmd } => jobdefinition::handle(&config, cmd).await,
        MainCommands::Remoteci { cmd } => remoteci::handle(&config, cmd).await,
        MainCommands::Team { cmd } => team::handle(&config, cmd).await,
        MainCommands::User { cmd } => user::handle(&config, cmd).await,
        MainCommands::Config { .. } | MainCommands::Login { .. } => Ok(()),
    };

    if let Err(e) = res {
        report(&config, e);
    }

    Ok(())
}

async fn login(server: Option<String>, username: Option<String>) {
    let server = match server {
        Some(server) => Some(server),
        None => match set_get_value(ConfigKey::Server, None, true) {
            Ok(Some(server)) => Some(server),
            _ => {
                let server = ask_for_input("Server URL").unwrap_or_else(|e| {
                    eprintln!("{}", e);
                    exit(1);
                });

                if let Err(e) = set_get_value(ConfigKey::Server, Some(server.clone()), true) {
                    eprintln!("{}", e);
                    exit(1);
                }

                Some(server)
            }
        },
    };

    let config = request_config(server);
    info!(server = %config.server_url, "Logging in");
    let credentials = or_ask(username, "Username")
        .and_then(|username| ask_for_password().map(|password| (username, password)));

    let (username, password) = credentials.unwrap_or_else(|e| {
        eprintln!("{}", e);
        exit(1);
    });

    match auth::login(&config, &username, &password).await {
        Ok(user) => {
            let team = user.team.map(|team| team.name).unwrap_or_default();
            println!("Logged in as {} ({}).", user.name, team);
        }
        Err(e) if e.is_unauthorized() => {
            eprintln!("Login failed: unauthorized.");
            exit(1);
        }
        Err(e) => {
            eprintln!("Login failed: {}", e);
            exit(1);
        }
    }
}

fn status(config: &RequestConfig) -> CommandResult {
    let snapshot = config.session.snapshot();

    println!("Server: {}", config.server_url);
    match snapshot.state {
        SessionState::Authenticated => {
            let name = snapshot.user.map(|user| user.name).unwrap_or_default();
            let role = if config.session.is_admin() { " (admin)" } else { "" };
            println!("Logged in as {}{}.", name, role);
            Ok(())
        }
        _ => Err(Error::missing_token().into()),
    }
}

async fn info(config: &RequestConfig) -> CommandResult {
    let Some(user) = config.session.user() else {
        return Err(Error::missing_token().into());
    };

    let user = users::get_current_user(config, &user.name).await?;

    println!("User ID: {}", user.id);
    println!("Name: {}", user.name);
    println!("Role: {}", user.role);
    if let Some(team) = user.team {
        println!("Team: {} ({})", team.name, team.id);
    } else {
        println!("Team ID: {}", user.team_id);
    }

    Ok(())
}
