// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! REST implementation of the remote seams.
//!
//! Each mutation maps to exactly one request (see [`route`]). Every request
//! carries the queued record id as an `Idempotency-Key` header so a server
//! that honours it can drop a duplicate that was delivered both by the
//! unload beacon and by a later drain.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use sw_core::{
    AlertMutation, CameraMutation, Entity, Mutation, OperationRecord, UserMutation,
};
use tokio_util::task::TaskTracker;

use super::executor::{Beacon, CollectionSource, ExecResult, ExecutorError, RemoteExecutor};
use super::probe::HealthCheck;
use crate::config::ApiConfig;

/// Header carrying the queued record id.
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Path the unload beacon posts to.
pub const BEACON_PATH: &str = "sync/beacon";

/// How long a beacon send may take before it is abandoned.
pub const BEACON_DEADLINE: Duration = Duration::from_secs(2);

/// Path probed for reachability.
pub const HEALTH_PATH: &str = "health";

/// One REST call.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl Route {
    fn new(method: Method, path: String, body: Option<Value>) -> Self {
        Route { method, path, body }
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> ExecResult<Option<Value>> {
    serde_json::to_value(value)
        .map(Some)
        .map_err(|e| ExecutorError::Undeliverable(e.to_string()))
}

/// Maps a mutation to its REST call.
pub fn route(mutation: &Mutation) -> ExecResult<Route> {
    let route = match mutation {
        Mutation::Users(m) => match m {
            UserMutation::Create(user) => Route::new(Method::POST, "users".into(), to_body(user)?),
            UserMutation::Update(u) => Route::new(
                Method::PUT,
                format!("users/{}", u.user_id),
                to_body(&u.changes)?,
            ),
            UserMutation::UpdateStatus(u) => Route::new(
                Method::POST,
                format!("users/{}/status", u.user_id),
                Some(json!({ "action": u.action })),
            ),
            UserMutation::Delete(u) => {
                Route::new(Method::DELETE, format!("users/{}", u.user_id), None)
            }
        },
        Mutation::Cameras(m) => match m {
            CameraMutation::Create(camera) => {
                Route::new(Method::POST, "cameras".into(), to_body(camera)?)
            }
            CameraMutation::Update(c) => Route::new(
                Method::PUT,
                format!("cameras/{}", c.camera_id),
                to_body(&c.changes)?,
            ),
            CameraMutation::UpdateStatus(c) => Route::new(
                Method::PATCH,
                format!("cameras/{}/status", c.camera_id),
                Some(json!({ "isActive": c.is_active })),
            ),
            CameraMutation::Delete(c) => {
                Route::new(Method::DELETE, format!("cameras/{}", c.camera_id), None)
            }
        },
        Mutation::Alerts(AlertMutation::Update(a)) => Route::new(
            Method::PUT,
            format!("alerts/{}", a.alert_id),
            to_body(&a.changes)?,
        ),
    };
    Ok(route)
}

/// reqwest-backed executor, beacon, collection source and health check.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
    base_url: String,
    token: Option<String>,
    beacons: TaskTracker,
}

impl HttpExecutor {
    /// Builds an executor talking to `base_url`.
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> ExecResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExecutorError::Setup(e.to_string()))?;
        Ok(HttpExecutor {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            beacons: TaskTracker::new(),
        })
    }

    pub fn from_config(api: &ApiConfig) -> ExecResult<Self> {
        Self::new(
            &api.base_url,
            api.token.clone(),
            Duration::from_secs(api.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn deliver(&self, record_id: &str, mutation: &Mutation) -> ExecResult<()> {
        let route = route(mutation)?;
        let mut builder = self
            .request(route.method.clone(), &route.path)
            .header(IDEMPOTENCY_HEADER, record_id);
        if let Some(body) = &route.body {
            builder = builder.json(body);
        }

        tracing::debug!(record_id, method = %route.method, path = %route.path, "sending mutation");
        let response = builder
            .send()
            .await
            .map_err(|e| ExecutorError::Network(e.to_string()))?;
        check_status(response).await.map(|_| ())
    }

    async fn fetch<E: Entity>(&self) -> ExecResult<Vec<E>> {
        let response = self
            .request(Method::GET, E::ENTITY_TYPE.as_str())
            .send()
            .await
            .map_err(|e| ExecutorError::Network(e.to_string()))?;
        let response = check_status(response).await?;
        response
            .json::<Vec<E>>()
            .await
            .map_err(|e| ExecutorError::InvalidResponse(e.to_string()))
    }

    /// Posts `records` to the beacon endpoint and waits for the answer.
    pub async fn post_beacon(&self, records: &[OperationRecord]) -> ExecResult<()> {
        let response = self
            .request(Method::POST, BEACON_PATH)
            .json(records)
            .send()
            .await
            .map_err(|e| ExecutorError::Network(e.to_string()))?;
        check_status(response).await.map(|_| ())
    }

    /// Returns whether the API answered at all. Any HTTP status counts as
    /// reachable; only transport failures count as offline.
    pub async fn ping(&self) -> bool {
        match self.request(Method::GET, HEALTH_PATH).send().await {
            Ok(_) => true,
            Err(e) => {
                tracing::trace!(error = %e, "health check failed");
                false
            }
        }
    }
}

async fn check_status(response: reqwest::Response) -> ExecResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, body))
}

fn status_error(status: StatusCode, body: String) -> ExecutorError {
    if status.is_server_error() {
        ExecutorError::Server {
            status: status.as_u16(),
            body,
        }
    } else {
        ExecutorError::Rejected {
            status: status.as_u16(),
            body,
        }
    }
}

impl RemoteExecutor for HttpExecutor {
    fn execute<'a>(
        &'a self,
        record_id: &'a str,
        mutation: &'a Mutation,
    ) -> Pin<Box<dyn Future<Output = ExecResult<()>> + Send + 'a>> {
        Box::pin(self.deliver(record_id, mutation))
    }
}

impl<E: Entity> CollectionSource<E> for HttpExecutor {
    fn fetch_all(&self) -> Pin<Box<dyn Future<Output = ExecResult<Vec<E>>> + Send + '_>> {
        Box::pin(self.fetch::<E>())
    }
}

impl Beacon for HttpExecutor {
    fn send(&self, records: Vec<OperationRecord>) -> bool {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no runtime available for unload beacon");
            return false;
        };
        let executor = self.clone();
        let count = records.len();
        self.beacons.spawn_on(
            async move {
                match tokio::time::timeout(BEACON_DEADLINE, executor.post_beacon(&records)).await {
                    Ok(Ok(())) => tracing::debug!(count, "unload beacon delivered"),
                    Ok(Err(e)) => tracing::debug!(count, error = %e, "unload beacon failed"),
                    Err(_) => tracing::debug!(count, "unload beacon timed out"),
                }
            },
            &handle,
        );
        true
    }

    fn settle(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            self.beacons.close();
            self.beacons.wait().await;
            self.beacons.reopen();
        })
    }
}

impl HealthCheck for HttpExecutor {
    fn check(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(self.ping())
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
