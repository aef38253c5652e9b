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
    Show {
        id: String,
    },
}

pub async fn handle(config: &RequestConfig, cmd: Commands) -> CommandResult {
    match cmd {
        Commands::List { page } => {
            let res = jobdefinitions::get_jobdefinitions(config, page).await?;

            if res.jobdefinitions.is_empty() {
                println!("No job definitions.");
            }

            for jobdefinition in &res.jobdefinitions {
                let test = jobdefinition
                    .test
                    .as_ref()
                    .map(|test| test.name.as_str())
                    .unwrap_or(&jobdefinition.test_id);
                println!("{}: {} [{}]", jobdefinition.name, jobdefinition.id, test);
            }

            println!(
                "Page {}/{} ({} job definitions)",
                page.max(1),
                res.total_pages(),
                res.total_count
            );
        }

        Commands::Show { id } => {
            let jobdefinition = jobdefinitions::get_jobdefinition(config, &id).await?;

            println!("Name: {}", jobdefinition.name);
            println!("ID: {}", jobdefinition.id);
            if let Some(priority) = jobdefinition.priority {
                println!("Priority: {}", priority);
            }
            match &jobdefinition.test {
                Some(test) => println!("Test: {}", test.name),
                None => println!("Test ID: {}", jobdefinition.test_id),
            }
            println!();

            if jobdefinition.components.is_empty() {
                println!("No components.");
            } else {
                println!("===== Components =====");
                for component in &jobdefinition.components {
                    match &component.sha {
                        Some(sha) => println!("{} @ {}", component.name, sha),
                        None => println!("{}", component.name),
                    }
                }
            }
        }
    }

    Ok(())
}
