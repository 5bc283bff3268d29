//! Data source doubles shared by the container tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;
use todos_core::{Address, ApiError, Company, DataSource, Geo, Todo, User, UserId};

pub fn user(id: UserId, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        username: name.to_lowercase(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "555-0100".to_string(),
        website: "example.com".to_string(),
        address: Address {
            street: "Main St".to_string(),
            suite: "Apt. 1".to_string(),
            city: "Springfield".to_string(),
            zipcode: "00000".to_string(),
            geo: Geo {
                lat: "0".to_string(),
                lng: "0".to_string(),
            },
        },
        company: Company {
            name: "Acme".to_string(),
            catch_phrase: "Things".to_string(),
            bs: "stuff".to_string(),
        },
    }
}

pub fn todo(id: u32, user_id: UserId, title: &str, completed: bool) -> Todo {
    Todo {
        id,
        user_id,
        title: title.to_string(),
        completed,
    }
}

/// Answers immediately from fixed data, or fails every call.
pub struct Canned {
    pub users: Vec<User>,
    pub todos: HashMap<UserId, Vec<Todo>>,
    pub failure: Option<Box<dyn Fn() -> ApiError + Send + Sync>>,
    calls: AtomicUsize,
}

impl Canned {
    pub fn new(users: Vec<User>, todos: HashMap<UserId, Vec<Todo>>) -> Self {
        Self {
            users,
            todos,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(make: impl Fn() -> ApiError + Send + Sync + 'static) -> Self {
        Self {
            failure: Some(Box::new(make)),
            ..Self::new(Vec::new(), HashMap::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for Canned {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(make) => Err(make()),
            None => Ok(self.users.clone()),
        }
    }

    async fn list_todos(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(make) => Err(make()),
            None => Ok(self.todos.get(&user_id).cloned().unwrap_or_default()),
        }
    }
}

pub type Reply<T> = oneshot::Sender<Result<Vec<T>, ApiError>>;

/// Parks every call until the test answers it, so tests control both
/// interleaving and completion order.
#[derive(Default)]
pub struct Gated {
    users: Mutex<VecDeque<Reply<User>>>,
    todos: Mutex<VecDeque<(UserId, Reply<Todo>)>>,
    calls: AtomicUsize,
}

impl Gated {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Wait for the next parked `list_users` call.
    pub async fn next_users(&self) -> Reply<User> {
        loop {
            if let Some(reply) = self.users.lock().unwrap().pop_front() {
                return reply;
            }
            tokio::task::yield_now().await;
        }
    }

    /// Wait for the next parked `list_todos` call.
    pub async fn next_todos(&self) -> (UserId, Reply<Todo>) {
        loop {
            if let Some(call) = self.todos.lock().unwrap().pop_front() {
                return call;
            }
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl DataSource for Gated {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.users.lock().unwrap().push_back(tx);
        rx.await
            .unwrap_or_else(|_| Err(ApiError::Transport("reply dropped".to_string())))
    }

    async fn list_todos(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.todos.lock().unwrap().push_back((user_id, tx));
        rx.await
            .unwrap_or_else(|_| Err(ApiError::Transport("reply dropped".to_string())))
    }
}
