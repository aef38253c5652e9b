/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::*;
use base64::{Engine as _, engine::general_purpose};
use tracing::{info, instrument};

pub fn encode_token(username: &str, password: &str) -> String {
    general_purpose::STANDARD.encode(format!("{}:{}", username, password))
}

/// Confirms the credential against the API and persists it on success.
///
/// The candidate token is held in memory while the identity lookup runs so
/// the lookup goes through the regular request path. It is only written to
/// the session store once the API accepted it.
#[instrument(skip(config, password))]
pub async fn login(config: &RequestConfig, username: &str, password: &str) -> Result<User> {
    let token = encode_token(username, password);
    config.session.begin_login(token.clone());

    match users::get_current_user(config, username).await {
        Ok(user) => {
            if let Err(e) = config.session.complete_login(token, user.clone()) {
                config.session.fail_login();
                return Err(e);
            }

            Ok(user)
        }
        Err(e) => {
            info!("Login rejected: {}", e);
            config.session.fail_login();
            Err(e)
        }
    }
}

pub fn logout(config: &RequestConfig) -> Result<()> {
    config.session.disconnect()
}
