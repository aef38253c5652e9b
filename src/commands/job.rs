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
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u64,
    },
    Show {
        id: String,
    },
    Search {
        #[arg(short, long)]
        remoteci: Vec<String>,
        #[arg(short, long)]
        status: Vec<String>,
    },
    Recheck {
        id: String,
    },
}

pub async fn handle(config: &RequestConfig, cmd: Commands) -> CommandResult {
    match cmd {
        Commands::List { page } => {
            let res = jobs::get_jobs(config, page).await?;

            if res.jobs.is_empty() {
                println!("No jobs.");
            } else {
                print_jobs(&res.jobs);
            }

            println!("Page {}/{} ({} jobs)", page.max(1), res.total_pages(), res.total_count);
        }

        Commands::Show { id } => {
            let handle = jobs::get_job(config, &id).await?;
            let job = handle.job();

            println!("===== Job =====");
            println!("ID: {}", job.id);
            println!("Status: {}", job.status);
            println!("RemoteCI: {}", remoteci_name(&job));
            println!("Job Definition: {}", jobdefinition_name(&job));
            if let Some(test) = job.jobdefinition.as_ref().and_then(|jd| jd.test.as_ref()) {
                println!("Test: {}", test.name);
            }
            println!("Created At: {}", job.created_at);
            println!("Updated At: {}", job.updated_at);
            println!();

            if job.jobstates.is_empty() {
                println!("No job states.");
                return Ok(());
            }

            let completed = handle.complete().await;

            println!("===== States =====");
            for jobstate in &completed.job.jobstates {
                println!("{}  {}", jobstate.created_at, jobstate.status);
                if let Some(comment) = &jobstate.comment {
                    println!("    {}", comment);
                }
                if completed.files_unavailable(&jobstate.id) {
                    println!("    files unavailable");
                    continue;
                }
                for file in &jobstate.files {
                    println!("    - {} ({})", file.name, file.id);
                }
            }
        }

        Commands::Search { remoteci, status } => {
            let res = jobs::search_jobs(config, &split_list(remoteci), &split_list(status)).await?;

            if res.is_empty() {
                println!("No jobs match.");
            } else {
                print_jobs(&res);
            }
        }

        Commands::Recheck { id } => {
            let job = jobs::recheck_job(config, &id).await?;
            println!("Job {} rechecked as {}.", id, job.id);
        }
    }

    Ok(())
}

fn remoteci_name(job: &Job) -> &str {
    job.remoteci
        .as_ref()
        .map(|remoteci| remoteci.name.as_str())
        .unwrap_or(&job.remoteci_id)
}

fn jobdefinition_name(job: &Job) -> &str {
    job.jobdefinition
        .as_ref()
        .map(|jobdefinition| jobdefinition.name.as_str())
        .unwrap_or(&job.jobdefinition_id)
}

fn print_jobs(jobs: &[Job]) {
    for job in jobs {
        println!(
            "{}  {:<9} {:<24} {:<32} {}",
            job.id,
            job.status.to_string(),
            remoteci_name(job),
            jobdefinition_name(job),
            job.updated_at
        );
    }
}
