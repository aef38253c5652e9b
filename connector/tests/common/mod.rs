/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

#![allow(dead_code)]

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use connector::*;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BOB_TOKEN: &str = "Ym9iOnB3";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub params: HashMap<String, String>,
    pub authorization: Option<String>,
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    path: String,
    params: Vec<(String, String)>,
    status: StatusCode,
    body: Value,
    delay: Option<Duration>,
}

#[derive(Debug, Default)]
struct MockState {
    routes: Vec<Route>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process stand-in for the REST API.
///
/// Routes match on method, path and a subset of query parameters; the first
/// matching route answers. Unknown requests get a 404.
#[derive(Debug, Default)]
pub struct MockApi {
    routes: Vec<Route>,
}

pub struct RunningApi {
    pub url: String,
    state: Arc<MockState>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(
        mut self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        status: StatusCode,
        body: Value,
    ) -> Self {
        self.routes.push(Route {
            method,
            path: format!("/api/v1/{}", path),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            status,
            body,
            delay: None,
        });
        self
    }

    pub fn get(self, path: &str, params: &[(&str, &str)], body: Value) -> Self {
        self.route(Method::GET, path, params, StatusCode::OK, body)
    }

    /// Delays the most recently added route.
    pub fn delayed(mut self, delay: Duration) -> Self {
        if let Some(route) = self.routes.last_mut() {
            route.delay = Some(delay);
        }
        self
    }

    pub async fn start(self) -> RunningApi {
        let state = Arc::new(MockState {
            routes: self.routes,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        RunningApi {
            url: format!("http://{}", addr),
            state,
        }
    }
}

impl RunningApi {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn hits(&self, path: &str) -> usize {
        let path = format!("/api/v1/{}", path);
        self.requests().iter().filter(|req| req.path == path).count()
    }

    pub fn config(&self, session: Session) -> RequestConfig {
        RequestConfig::new(self.url.clone(), Arc::new(session))
    }

    /// A config whose session is already authenticated as bob.
    pub fn authenticated(&self) -> RequestConfig {
        self.config(authenticated_session(false))
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        params: params.clone(),
        authorization,
    });

    let route = state.routes.iter().find(|route| {
        route.method == method
            && route.path == uri.path()
            && route
                .params
                .iter()
                .all(|(k, v)| params.get(k).is_some_and(|value| value == v))
    });

    match route {
        Some(route) => {
            if let Some(delay) = route.delay {
                tokio::time::sleep(delay).await;
            }
            (route.status, Json(route.body.clone()))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": format!("no route for {} {}", method, uri)})),
        ),
    }
}

pub fn user_json(name: &str, team: &str) -> Value {
    json!({
        "id": format!("user-{}", name),
        "name": name,
        "role": if team == "admin" { "admin" } else { "user" },
        "team_id": format!("team-{}", team),
        "team": {"id": format!("team-{}", team), "name": team}
    })
}

pub fn authenticated_session(admin: bool) -> Session {
    let team = if admin { "admin" } else { "partner" };
    let user: User = serde_json::from_value(user_json("bob", team)).unwrap();

    Session::restore(Box::new(MemoryStore::with_record(SessionRecord {
        token: BOB_TOKEN.to_string(),
        user,
    })))
    .unwrap()
}

pub fn job_json(id: &str, status: &str, remoteci_id: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "created_at": "2016-03-01T10:00:00.000000",
        "updated_at": "2016-03-01T11:00:00.000000",
        "remoteci_id": remoteci_id,
        "jobdefinition_id": "jd-1",
        "remoteci": {"id": remoteci_id, "name": format!("name-{}", remoteci_id)},
        "jobdefinition": {
            "id": "jd-1",
            "name": "khaleesi-tempest",
            "test_id": "test-1",
            "test": {"id": "test-1", "name": "tempest"}
        }
    })
}

pub fn jobstate_json(id: &str, job_id: &str, status: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "job_id": job_id,
        "status": status,
        "created_at": created_at
    })
}

pub fn file_json(id: &str, jobstate_id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "jobstate_id": jobstate_id,
        "name": name,
        "mime": "text/plain",
        "content": "all tests passed"
    })
}

pub fn job_ids(jobs: &[Job]) -> Vec<&str> {
    jobs.iter().map(|job| job.id.as_str()).collect()
}
