/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::*;
use tracing::instrument;

#[instrument(skip(config))]
pub async fn get_remotecis(config: &RequestConfig, page: u64) -> Result<RemoteCiPage> {
    let query = ListQuery::page(page).sort("-created_at");
    let (remotecis, meta) = get_list(config, "remotecis", &query).await?;
    let total_count = meta.total_count().unwrap_or(remotecis.len() as u64);

    Ok(RemoteCiPage {
        remotecis,
        total_count,
    })
}

/// All RemoteCIs registered under `name`.
pub async fn find_by_name(config: &RequestConfig, name: &str) -> Result<Vec<RemoteCi>> {
    let query = ListQuery::default().filter("name", name);
    let (remotecis, _) = get_list(config, "remotecis", &query).await?;
    Ok(remotecis)
}
