/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Job views: the paginated list, faceted search and the detail view with
//! its state timeline and attached files.

use crate::*;
use futures::future::try_join_all;
use futures::try_join;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

const JOB_EMBED: &[&str] = &["remoteci", "jobdefinition", "jobdefinition.test"];

/// A job whose files are still arriving.
///
/// The job and its state timeline are complete as soon as the handle exists.
/// Files of every jobstate are fetched in the background and patched into
/// the watched value as each fetch resolves. Dropping the handle aborts the
/// fetches that are still in flight.
#[derive(Debug)]
pub struct JobHandle {
    receiver: watch::Receiver<Job>,
    tasks: JoinSet<Result<String>>,
}

/// A job after every file fetch resolved, successfully or not.
#[derive(Debug)]
pub struct CompletedJob {
    pub job: Job,
    /// Why file fetches failed, in completion order.
    pub errors: Vec<Error>,
    fetched: HashSet<String>,
}

impl CompletedJob {
    /// True when the files of `jobstate_id` could not be fetched.
    pub fn files_unavailable(&self, jobstate_id: &str) -> bool {
        !self.fetched.contains(jobstate_id)
    }

    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

impl JobHandle {
    pub fn job(&self) -> Job {
        self.receiver.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Job> {
        self.receiver.clone()
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for every file fetch. A failed fetch only affects its own jobstate.
    pub async fn complete(mut self) -> CompletedJob {
        let mut fetched = HashSet::new();
        let mut errors = Vec::new();

        while let Some(joined) = self.tasks.join_next().await {
            match joined.map_err(Error::from).and_then(|res| res) {
                Ok(jobstate_id) => {
                    fetched.insert(jobstate_id);
                }
                Err(e) => errors.push(e),
            }
        }

        CompletedJob {
            job: self.job(),
            errors,
            fetched,
        }
    }
}

#[instrument(skip(config))]
pub async fn get_jobs(config: &RequestConfig, page: u64) -> Result<JobPage> {
    let query = ListQuery::page(page).sort("-updated_at").embed(JOB_EMBED);
    let (jobs, meta) = get_list::<Job>(config, "jobs", &query).await?;
    let total_count = meta.total_count().unwrap_or(jobs.len() as u64);

    Ok(JobPage { jobs, total_count })
}

#[instrument(skip(config))]
pub async fn get_job(config: &RequestConfig, id: &str) -> Result<JobHandle> {
    let (job, jobstates) = try_join!(fetch_job(config, id), get_jobstates(config, id))?;
    let job = job.with_jobstates(jobstates);

    let jobstate_ids: Vec<String> = job.jobstates.iter().map(|js| js.id.clone()).collect();
    let (sender, receiver) = watch::channel(job);
    let sender = Arc::new(sender);
    let mut tasks = JoinSet::new();

    for (index, jobstate_id) in jobstate_ids.into_iter().enumerate() {
        let config = config.clone();
        let sender = Arc::clone(&sender);

        tasks.spawn(async move {
            let files = match get_files(&config, &jobstate_id).await {
                Ok(files) => files,
                Err(e) => {
                    warn!("Failed to fetch files of jobstate {}: {}", jobstate_id, e);
                    return Err(e);
                }
            };

            debug!("Attaching {} files to jobstate {}", files.len(), jobstate_id);
            sender.send_modify(|job| {
                if let Some(jobstate) = job.jobstates.get_mut(index) {
                    jobstate.files = files;
                }

                job.sync_jobstate();
            });

            Ok(jobstate_id)
        });
    }

    Ok(JobHandle { receiver, tasks })
}

async fn fetch_job(config: &RequestConfig, id: &str) -> Result<Job> {
    get_one(config, &["jobs", id], "job", JOB_EMBED).await
}

/// The state timeline of a job, oldest first.
pub async fn get_jobstates(config: &RequestConfig, job_id: &str) -> Result<Vec<JobState>> {
    let query = ListQuery::default()
        .sort("created_at")
        .filter("job_id", job_id);
    let (jobstates, _) = get_list(config, "jobstates", &query).await?;
    Ok(jobstates)
}

pub async fn get_files(config: &RequestConfig, jobstate_id: &str) -> Result<Vec<File>> {
    let query = ListQuery::default()
        .sort("created_at")
        .filter("jobstate_id", jobstate_id);
    let (files, _) = get_list(config, "files", &query).await?;
    Ok(files)
}

/// Creates a new job from `job_id`. The original job is left untouched.
#[instrument(skip(config))]
pub async fn recheck_job(config: &RequestConfig, job_id: &str) -> Result<Job> {
    post_one::<(), Job>(config, &["jobs", job_id, "recheck"], "job", None).await
}

/// Jobs of the selected RemoteCIs intersected with jobs in the selected statuses.
///
/// An empty facet does not constrain the result, two empty facets yield no
/// jobs. Every lookup of both facets runs concurrently and any failing
/// lookup fails the whole search.
#[instrument(skip(config))]
pub async fn search_jobs(
    config: &RequestConfig,
    remotecis: &[String],
    statuses: &[String],
) -> Result<Vec<Job>> {
    let remotecis = distinct(remotecis.iter().map(String::as_str));
    let statuses = distinct(statuses.iter().map(String::as_str))
        .into_iter()
        .map(|status| {
            JobStatus::from_str(status)
                .map_err(|_| Error::InvalidInput(format!("unknown job status \"{}\"", status)))
        })
        .collect::<Result<Vec<_>>>()?;

    if remotecis.is_empty() && statuses.is_empty() {
        return Ok(Vec::new());
    }

    let (remoteci_jobs, status_jobs) = try_join!(
        jobs_of_remotecis(config, &remotecis),
        jobs_with_statuses(config, &statuses)
    )?;

    Ok(combine(remoteci_jobs, status_jobs))
}

async fn jobs_of_remotecis(config: &RequestConfig, names: &[&str]) -> Result<Vec<Job>> {
    let resolved = try_join_all(
        names
            .iter()
            .map(|name| remotecis::find_by_name(config, name)),
    )
    .await?;

    let ids = distinct(resolved.iter().flatten().map(|remoteci| remoteci.id.as_str()));
    let jobs = try_join_all(ids.iter().map(|id| {
        let query = ListQuery::default()
            .sort("-updated_at")
            .filter("remoteci_id", *id)
            .embed(JOB_EMBED);

        async move { get_list::<Job>(config, "jobs", &query).await.map(|(jobs, _)| jobs) }
    }))
    .await?;

    Ok(jobs.into_iter().flatten().collect())
}

async fn jobs_with_statuses(config: &RequestConfig, statuses: &[JobStatus]) -> Result<Vec<Job>> {
    let jobs = try_join_all(statuses.iter().map(|status| {
        let query = ListQuery::default()
            .sort("-updated_at")
            .filter("status", status.to_string())
            .embed(JOB_EMBED);

        async move { get_list::<Job>(config, "jobs", &query).await.map(|(jobs, _)| jobs) }
    }))
    .await?;

    Ok(jobs.into_iter().flatten().collect())
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|value| seen.insert(*value)).collect()
}

/// Intersects by job id in status order, or returns whichever side is non-empty.
fn combine(remoteci_jobs: Vec<Job>, status_jobs: Vec<Job>) -> Vec<Job> {
    match (remoteci_jobs.is_empty(), status_jobs.is_empty()) {
        (true, true) => Vec::new(),
        (false, true) => remoteci_jobs,
        (true, false) => status_jobs,
        (false, false) => {
            let ids: HashSet<&str> = remoteci_jobs.iter().map(|job| job.id.as_str()).collect();
            status_jobs
                .into_iter()
                .filter(|job| ids.contains(job.id.as_str()))
                .collect()
        }
    }
}
