//! Domain DTOs for the users/todos API.
//!
//! # Design
//! Field names follow the JSONPlaceholder wire schema through serde renames
//! so the Rust side keeps snake_case. The mock-server crate defines its own
//! copies of these shapes; integration tests catch schema drift.

use serde::{Deserialize, Serialize};

/// Identifier of a user. Also the foreign key carried by every `Todo`.
pub type UserId = u32;

/// A user as returned by `GET /users`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: Address,
    pub company: Company,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

/// Coordinates are kept as the strings the API sends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Company {
    pub name: String,
    #[serde(rename = "catchPhrase")]
    pub catch_phrase: String,
    pub bs: String,
}

/// A single todo item returned by `GET /todos?userId=N`.
///
/// `user_id` is trusted as sent; nothing checks it against the requested user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: u32,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub title: String,
    pub completed: bool,
}

/// Completion statistics for one user's todo list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoSummary {
    pub completed: usize,
    pub total: usize,
    /// Whole percent, truncated toward zero. Zero for an empty list.
    pub completion_rate: u32,
}

impl TodoSummary {
    pub fn of(todos: &[Todo]) -> Self {
        let completed = todos.iter().filter(|t| t.completed).count();
        let total = todos.len();
        let completion_rate = if total == 0 {
            0
        } else {
            u32::try_from(completed * 100 / total).unwrap_or(100)
        };
        Self {
            completed,
            total,
            completion_rate,
        }
    }
}
