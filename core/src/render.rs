//! Plain-text rendering of the two screens.
//!
//! Pure functions from a `ViewState` to display lines. Hosts with their own
//! widgets can ignore this and render the state themselves.

use crate::types::{Todo, TodoSummary, User};
use crate::view_state::ViewState;

pub const ERROR_TITLE: &str = "Something Went Wrong";
pub const RETRY_LABEL: &str = "[Try Again]";

pub fn render_users(state: &ViewState<User>) -> Vec<String> {
    match state {
        ViewState::Loading => vec!["Loading users...".to_string()],
        ViewState::Error(message) => render_error(message),
        ViewState::Success(users) => {
            let mut lines = Vec::with_capacity(users.len() + 1);
            lines.push(format!("{} Users", users.len()));
            lines.extend(users.iter().map(user_row));
            lines
        }
    }
}

pub fn render_todos(state: &ViewState<Todo>) -> Vec<String> {
    match state {
        ViewState::Loading => vec!["Loading todos...".to_string()],
        ViewState::Error(message) => render_error(message),
        ViewState::Success(todos) => {
            let summary = TodoSummary::of(todos);
            let mut lines = Vec::with_capacity(todos.len() + 2);
            lines.push(format!(
                "{}/{} Tasks Completed",
                summary.completed, summary.total
            ));
            lines.push(format!("{}% completion rate", summary.completion_rate));
            lines.extend(todos.iter().map(todo_row));
            lines
        }
    }
}

fn render_error(message: &str) -> Vec<String> {
    vec![
        ERROR_TITLE.to_string(),
        message.to_string(),
        RETRY_LABEL.to_string(),
    ]
}

fn user_row(user: &User) -> String {
    format!(
        "{} (@{}) · {} · {} · {} · {}",
        user.name,
        user.username,
        user.email,
        user.phone,
        user.address.city,
        user.company.name
    )
}

fn todo_row(todo: &Todo) -> String {
    if todo.completed {
        format!("[x] {} DONE", todo.title)
    } else {
        format!("[ ] {}", todo.title)
    }
}
