/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Name of the reserved team whose members may administrate teams and users.
pub const ADMIN_TEAM: &str = "admin";

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum JobStatus {
    New,
    PreRun,
    Running,
    PostRun,
    Success,
    Failure,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub remoteci_id: String,
    pub jobdefinition_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remoteci: Option<RemoteCi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobdefinition: Option<JobDefinition>,
    #[serde(default)]
    pub jobstates: Vec<JobState>,
    /// Always the last entry of `jobstates`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobstate: Option<JobState>,
}

impl Job {
    /// Attaches the state timeline (oldest first) and points `jobstate` at its tail.
    pub fn with_jobstates(mut self, jobstates: Vec<JobState>) -> Self {
        self.jobstates = jobstates;
        self.sync_jobstate();
        self
    }

    pub(crate) fn sync_jobstate(&mut self) {
        self.jobstate = self.jobstates.last().cloned();
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JobState {
    pub id: String,
    pub job_id: String,
    pub status: JobStatus,
    pub created_at: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub files: Vec<File>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct File {
    pub id: String,
    pub jobstate_id: String,
    pub name: String,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RemoteCi {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Test {
    pub id: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Component {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub componenttype_id: Option<String>,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JobDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub priority: Option<i64>,
    pub test_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<Test>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub team_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.team.as_ref().is_some_and(|team| team.name == ADMIN_TEAM)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub total_count: u64,
}

impl JobPage {
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total_count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobDefinitionPage {
    pub jobdefinitions: Vec<JobDefinition>,
    pub total_count: u64,
}

impl JobDefinitionPage {
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total_count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCiPage {
    pub remotecis: Vec<RemoteCi>,
    pub total_count: u64,
}

impl RemoteCiPage {
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total_count)
    }
}

fn total_pages(total_count: u64) -> u64 {
    total_count.div_ceil(crate::PAGE_SIZE).max(1)
}
