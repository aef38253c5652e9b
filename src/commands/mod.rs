/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod base;
pub mod job;
pub mod jobdefinition;
pub mod remoteci;
pub mod team;
pub mod user;

use connector::{Error, RequestConfig};

/// Everything a subcommand can fail with.
#[derive(Debug)]
pub enum CommandError {
    Api(Error),
    Input(String),
}

impl From<Error> for CommandError {
    fn from(err: Error) -> Self {
        CommandError::Api(err)
    }
}

impl From<String> for CommandError {
    fn from(err: String) -> Self {
        CommandError::Input(err)
    }
}

pub type CommandResult = Result<(), CommandError>;

/// Admin-only views are refused locally before any request is made.
pub fn require_admin(config: &RequestConfig) -> Result<(), CommandError> {
    if config.session.is_admin() {
        Ok(())
    } else {
        Err(CommandError::Input(
            "This command requires a member of the admin team.".to_string(),
        ))
    }
}
