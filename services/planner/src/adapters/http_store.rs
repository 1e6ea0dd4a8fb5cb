//! services/planner/src/adapters/http_store.rs
//!
//! This module contains the HTTP adapter, the concrete implementation of the
//! `RemoteStore` port from the `core` crate. It speaks the remote store's JSON
//! contract with `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use studytime_core::domain::{Activity, NewActivity, NewTask, NewUser, Stats, Task, User};
use studytime_core::ports::{PortError, PortResult, RemoteStore};
use tracing::debug;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `RemoteStore` port over HTTP.
#[derive(Clone)]
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
}

impl HttpRemoteStore {
    /// Creates a new `HttpRemoteStore` rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("{} {}{}", method, self.base_url, path);
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> PortResult<T> {
        let response = send(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> PortResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = send(self.request(method, path).json(body)).await?;
        decode(response).await
    }
}

//=========================================================================================
// Request Payloads
//=========================================================================================

#[derive(Serialize)]
struct CompletionUpdate {
    completed: bool,
}

//=========================================================================================
// Response Handling
//=========================================================================================

async fn send(request: RequestBuilder) -> PortResult<Response> {
    let response = request.send().await.map_err(|e| PortError::Network(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(PortError::NotFound(message));
    }
    Err(PortError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> PortResult<T> {
    let bytes = response.bytes().await.map_err(|e| PortError::Network(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| PortError::Decode(e.to_string()))
}

//=========================================================================================
// `RemoteStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn create_user(&self, user: &NewUser) -> PortResult<User> {
        self.send_json(Method::POST, "/users", user).await
    }

    async fn list_tasks(&self, user_id: Uuid) -> PortResult<Vec<Task>> {
        self.get_json(&format!("/users/{}/tasks", user_id)).await
    }

    async fn list_activities(&self, user_id: Uuid) -> PortResult<Vec<Activity>> {
        self.get_json(&format!("/users/{}/activities", user_id)).await
    }

    async fn get_stats(&self, user_id: Uuid) -> PortResult<Stats> {
        self.get_json(&format!("/users/{}/stats", user_id)).await
    }

    async fn create_task(&self, user_id: Uuid, task: &NewTask) -> PortResult<Task> {
        self.send_json(Method::POST, &format!("/users/{}/tasks", user_id), task).await
    }

    async fn create_activity(&self, user_id: Uuid, activity: &NewActivity) -> PortResult<Activity> {
        self.send_json(Method::POST, &format!("/users/{}/activities", user_id), activity)
            .await
    }

    async fn set_task_completed(&self, task_id: Uuid, completed: bool) -> PortResult<Task> {
        self.send_json(Method::PUT, &format!("/tasks/{}", task_id), &CompletionUpdate { completed })
            .await
    }

    async fn delete_task(&self, task_id: Uuid) -> PortResult<()> {
        send(self.request(Method::DELETE, &format!("/tasks/{}", task_id))).await?;
        Ok(())
    }

    async fn delete_activity(&self, activity_id: Uuid) -> PortResult<()> {
        send(self.request(Method::DELETE, &format!("/activities/{}", activity_id))).await?;
        Ok(())
    }
}
