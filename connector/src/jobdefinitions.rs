/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::*;
use tracing::instrument;

#[instrument(skip(config))]
pub async fn get_jobdefinitions(config: &RequestConfig, page: u64) -> Result<JobDefinitionPage> {
    let query = ListQuery::page(page).sort("-created_at").embed(&["test"]);
    let (jobdefinitions, meta) = get_list(config, "jobdefinitions", &query).await?;
    let total_count = meta
        .total_count()
        .unwrap_or(jobdefinitions.len() as u64);

    Ok(JobDefinitionPage {
        jobdefinitions,
        total_count,
    })
}

#[instrument(skip(config))]
pub async fn get_jobdefinition(config: &RequestConfig, id: &str) -> Result<JobDefinition> {
    get_one(
        config,
        &["jobdefinitions", id],
        "jobdefinition",
        &["test", "components"],
    )
    .await
}
