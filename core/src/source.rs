//! Data source abstraction and its reqwest-backed implementation.
//!
//! Containers receive a `DataSource` at construction, so tests swap in a
//! double and production code uses `RemoteDataSource`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::client::TodosClient;
use crate::config::Config;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Todo, User, UserId};

/// Read access to the users/todos service.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// All users, in the order the service returns them.
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    /// Todos belonging to `user_id`, in the order the service returns them.
    async fn list_todos(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError>;
}

#[async_trait]
impl<S: DataSource + ?Sized> DataSource for Arc<S> {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        (**self).list_users().await
    }

    async fn list_todos(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError> {
        (**self).list_todos(user_id).await
    }
}

/// `DataSource` that executes `TodosClient` requests over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteDataSource {
    client: TodosClient,
    http: reqwest::Client,
    config: Config,
}

impl RemoteDataSource {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(convert_error)?;
        Ok(Self::with_client(http, config))
    }

    /// Use a preconfigured `reqwest::Client`; only the base URL and delays
    /// are taken from `config`.
    pub fn with_client(http: reqwest::Client, config: Config) -> Self {
        Self {
            client: TodosClient::new(&config.base_url),
            http,
            config,
        }
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = request.method.as_str(), url = %request.path, "sending request");
        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.path),
        };
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        let response = builder.send().await.map_err(convert_error)?;
        let status = response.status();
        let body = response.text().await.map_err(convert_error)?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

#[async_trait]
impl DataSource for RemoteDataSource {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        tokio::time::sleep(self.config.users_delay).await;
        let response = self.execute(self.client.build_list_users()).await?;
        self.client.parse_list_users(response)
    }

    async fn list_todos(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError> {
        tokio::time::sleep(self.config.todos_delay).await;
        let response = self.execute(self.client.build_list_todos(user_id)).await?;
        self.client.parse_list_todos(response)
    }
}

/// Classify a reqwest failure. DNS failures surface as connect errors.
fn convert_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout(err.to_string())
    } else if err.is_connect() {
        ApiError::Connectivity(err.to_string())
    } else {
        ApiError::Transport(err.to_string())
    }
}
