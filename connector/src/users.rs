/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::*;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
struct MakeUserRequest {
    pub name: String,
    pub password: String,
    pub role: Role,
    pub team_id: String,
}

/// Identity lookup used to establish a session.
pub async fn get_current_user(config: &RequestConfig, username: &str) -> Result<User> {
    get_one(config, &["users", username], "user", &["team"]).await
}

pub async fn post_user(
    config: &RequestConfig,
    name: String,
    password: String,
    role: Role,
    team_id: String,
) -> Result<User> {
    let req = MakeUserRequest {
        name,
        password,
        role,
        team_id,
    };

    post_one(config, &["users"], "user", Some(&req)).await
}
