//! Client core for browsing users and their todos.
//!
//! # Overview
//! Fetches `GET /users` and `GET /todos?userId=N` from a JSONPlaceholder-style
//! API and exposes each screen as a `ViewState` (Loading, Success, Error)
//! owned by a container with `load` and `retry`.
//!
//! # Design
//! - `TodosClient` is stateless: `build_*` produces a request, `parse_*`
//!   consumes a response. The same mapping backs `RemoteDataSource` and the
//!   FFI host.
//! - Containers take their `DataSource` by injection; no global client.
//! - `Screen` tags each load with a generation so the latest load's result
//!   is the one observed last, whatever order responses arrive in.

pub mod client;
pub mod config;
pub mod container;
pub mod error;
pub mod http;
pub mod navigation;
pub mod render;
pub mod source;
pub mod types;
pub mod view_state;

pub use client::TodosClient;
pub use config::{Config, ConfigError};
pub use container::{TodosContainer, UsersContainer};
pub use error::{ApiError, FailureKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use navigation::{Navigator, Route};
pub use source::{DataSource, RemoteDataSource};
pub use types::{Address, Company, Geo, Todo, TodoSummary, User, UserId};
pub use view_state::{LoadTicket, Screen, ViewState};
