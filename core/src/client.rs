//! Stateless HTTP request builder and response parser for the users/todos API.
//!
//! # Design
//! `TodosClient` holds only a `base_url`. Each read operation is split into
//! a `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the round trip, so
//! the same mapping serves the async data source and an FFI host.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Todo, User, UserId};

/// Synchronous, stateless client for the users/todos API.
#[derive(Debug, Clone)]
pub struct TodosClient {
    base_url: String,
}

impl TodosClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_users(&self) -> HttpRequest {
        get(format!("{}/users", self.base_url))
    }

    pub fn build_list_todos(&self, user_id: UserId) -> HttpRequest {
        get(format!("{}/todos?userId={user_id}", self.base_url))
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        parse_list(response)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_list(response)
    }
}

fn get(path: String) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        path,
        headers: vec![("accept".to_string(), "application/json".to_string())],
        body: None,
    }
}

/// Check the status, reject bodies that carry no payload, then decode.
fn parse_list<T: DeserializeOwned>(response: HttpResponse) -> Result<Vec<T>, ApiError> {
    check_status(&response)?;
    let body = response.body.trim();
    if body.is_empty() || body == "null" {
        return Err(ApiError::EmptyResponse);
    }
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-2xx status codes to `ApiError::Http`, filling in the canonical
/// reason phrase when the transport did not supply one.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let reason = if response.reason.is_empty() {
        reqwest::StatusCode::from_u16(response.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string()
    } else {
        response.reason.clone()
    };
    Err(ApiError::Http {
        status: response.status,
        reason,
    })
}
