/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::*;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
struct MakeTeamRequest {
    pub name: String,
}

pub async fn get_teams(config: &RequestConfig) -> Result<Vec<Team>> {
    let (teams, _) = get_list(config, "teams", &ListQuery::default().sort("name")).await?;
    Ok(teams)
}

pub async fn post_team(config: &RequestConfig, name: String) -> Result<Team> {
    let req = MakeTeamRequest { name };
    post_one(config, &["teams"], "team", Some(&req)).await
}
