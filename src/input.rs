/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::config::*;
use connector::{RequestConfig, Session};
use rpassword::read_password;
use std::io;
use std::io::Write;
use std::sync::Arc;

fn prompt(label: &str) -> Result<(), String> {
    print!("{}: ", label);
    io::stdout().flush().map_err(|e| e.to_string())
}

pub fn ask_for_password() -> Result<String, String> {
    prompt("Password")?;
    let inp = read_password().map_err(|e| format!("Failed to read password: {}", e))?;

    if inp.is_empty() {
        return Err("Password cannot be empty.".to_string());
    }

    Ok(inp)
}

pub fn ask_for_input(label: &str) -> Result<String, String> {
    prompt(label)?;
    let mut inp = String::new();
    io::stdin()
        .read_line(&mut inp)
        .map_err(|e| format!("Failed to read {}: {}", label, e))?;
    let inp = inp.trim().to_string();

    if inp.is_empty() {
        return Err(format!("{} cannot be empty.", label));
    }

    Ok(inp)
}

/// Uses the given value or asks for it.
pub fn or_ask(value: Option<String>, label: &str) -> Result<String, String> {
    match value {
        Some(value) => Ok(value),
        None => ask_for_input(label),
    }
}

pub fn split_list(values: Vec<String>) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

pub fn get_server_url(server: Option<String>) -> Result<String, String> {
    if let Some(server) = server {
        return Ok(server);
    }

    get_value(&load_config()?, ConfigKey::Server).ok_or_else(|| {
        "Server URL not set. Use `dcibrowser config server <url>` to set it.".to_string()
    })
}

pub fn get_request_config(server: Option<String>) -> Result<RequestConfig, String> {
    let server_url = get_server_url(server)?;
    let store = TomlSessionStore::default_location()?;
    let session = Session::restore(Box::new(store)).map_err(|e| e.to_string())?;

    Ok(RequestConfig::new(server_url, Arc::new(session)))
}
