//! Routes between the user list and a user's todos.
//!
//! Only the user identifier travels with a route. Each visit to a todo route
//! gets a fresh `TodosContainer`, dropped again on `back`.

use std::fmt;
use std::sync::Arc;

use crate::container::{TodosContainer, UsersContainer};
use crate::source::DataSource;
use crate::types::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Users,
    /// `user_id` is `None` when a deep link carried an unparsable id.
    Todos { user_id: Option<UserId> },
}

impl Route {
    /// Parse `"userList"` or `"todos/{userId}"`. A non-numeric id yields
    /// `Todos { user_id: None }`; anything else is not a route.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim_matches('/');
        if path == "userList" {
            return Some(Route::Users);
        }
        let id = path.strip_prefix("todos/")?;
        Some(Route::Todos {
            user_id: id.parse().ok(),
        })
    }

    pub fn title(&self) -> String {
        match self {
            Route::Users => "Todo Users".to_string(),
            Route::Todos { user_id: Some(id) } => format!("User {id}'s Todos"),
            Route::Todos { user_id: None } => "Todos".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Users => write!(f, "userList"),
            Route::Todos { user_id: Some(id) } => write!(f, "todos/{id}"),
            Route::Todos { user_id: None } => write!(f, "todos/"),
        }
    }
}

/// Holds the current route and the containers behind it.
pub struct Navigator<S> {
    source: S,
    route: Route,
    users: Arc<UsersContainer<S>>,
    todos: Option<Arc<TodosContainer<S>>>,
}

impl<S: DataSource + Clone + 'static> Navigator<S> {
    /// Start on the user list and spawn its first load.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(source: S) -> Self {
        let users = Arc::new(UsersContainer::new(source.clone()));
        tokio::spawn({
            let users = Arc::clone(&users);
            async move { users.load().await }
        });
        Self {
            users,
            source,
            route: Route::Users,
            todos: None,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn title(&self) -> String {
        self.route.title()
    }

    pub fn users(&self) -> &Arc<UsersContainer<S>> {
        &self.users
    }

    /// The detail container, present while a todo route is active.
    pub fn todos(&self) -> Option<&Arc<TodosContainer<S>>> {
        self.todos.as_ref()
    }

    /// Show `user_id`'s todos and load them.
    pub async fn select_user(&mut self, user_id: UserId) -> Arc<TodosContainer<S>> {
        let container = self.activate_todos(Some(user_id));
        container.load(user_id).await;
        container
    }

    /// Follow a route path such as a deep link. A todo route with an
    /// unparsable id opens an empty detail screen whose retry reports the
    /// missing selection. Returns `false` for unknown paths.
    pub async fn open(&mut self, path: &str) -> bool {
        let Some(route) = Route::parse(path) else {
            tracing::warn!(path, "unknown route");
            return false;
        };
        match route {
            Route::Users => {
                self.back();
            }
            Route::Todos { user_id: Some(id) } => {
                self.select_user(id).await;
            }
            Route::Todos { user_id: None } => {
                self.activate_todos(None);
            }
        }
        true
    }

    /// Return to the user list. Returns `false` if already there.
    pub fn back(&mut self) -> bool {
        if self.route == Route::Users {
            return false;
        }
        self.route = Route::Users;
        self.todos = None;
        true
    }

    fn activate_todos(&mut self, user_id: Option<UserId>) -> Arc<TodosContainer<S>> {
        tracing::debug!(?user_id, "opening todos");
        let container = Arc::new(TodosContainer::new(self.source.clone()));
        self.route = Route::Todos { user_id };
        self.todos = Some(Arc::clone(&container));
        container
    }
}
