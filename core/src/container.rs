//! View-state containers for the user list and one user's todos.
//!
//! # Design
//! Each container wraps a `Screen` behind a `std::sync::Mutex` that is only
//! held for a state write, never across the data-source await. Every write
//! is mirrored into a `watch` channel while the lock is held, so observers
//! see writes in the same order the screen applied them. Failures never
//! escape: they become `ViewState::Error`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::error::{ApiError, NO_SELECTION_MESSAGE, TODOS_FALLBACK_MESSAGE, USERS_FALLBACK_MESSAGE};
use crate::source::DataSource;
use crate::types::{Todo, User, UserId};
use crate::view_state::{LoadTicket, Screen, ViewState};

/// A `Screen` plus the channel that publishes its state.
struct Slot<T> {
    screen: Mutex<Screen<T>>,
    tx: watch::Sender<ViewState<T>>,
}

impl<T: Clone> Slot<T> {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(ViewState::Loading);
        Self {
            screen: Mutex::new(Screen::new()),
            tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Screen<T>> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, screen: &Screen<T>) {
        self.tx.send_replace(screen.state().clone());
    }

    fn begin(&self) -> LoadTicket {
        let mut screen = self.lock();
        let ticket = screen.begin();
        self.publish(&screen);
        ticket
    }

    /// Apply `result` if `ticket` is still current. Only applied outcomes
    /// are logged as loaded or failed.
    fn finish(
        &self,
        what: &str,
        ticket: LoadTicket,
        result: Result<Vec<T>, ApiError>,
        fallback: &str,
    ) {
        let mut screen = self.lock();
        if !screen.is_current(ticket) {
            tracing::debug!(ticket = ticket.raw(), "dropping stale {what} result");
            return;
        }
        log_outcome(what, &result);
        screen.finish(ticket, result, fallback);
        self.publish(&screen);
    }

    fn fail(&self, message: &str) {
        let mut screen = self.lock();
        screen.fail(message);
        self.publish(&screen);
    }

    fn state(&self) -> ViewState<T> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.tx.subscribe()
    }
}

fn log_outcome<T>(what: &str, result: &Result<Vec<T>, ApiError>) {
    match result {
        Ok(items) => tracing::debug!(count = items.len(), "{what} loaded"),
        Err(err) => tracing::warn!(kind = ?err.kind(), error = %err, "{what} failed to load"),
    }
}

/// Owns the user-list `ViewState`.
pub struct UsersContainer<S> {
    source: S,
    slot: Slot<User>,
}

impl<S: DataSource> UsersContainer<S> {
    /// A container in `Loading`. Nothing is fetched until `load`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            slot: Slot::new(),
        }
    }

    pub async fn load(&self) {
        let ticket = self.slot.begin();
        tracing::debug!(ticket = ticket.raw(), "loading users");
        let result = self.source.list_users().await;
        self.slot.finish("users", ticket, result, USERS_FALLBACK_MESSAGE);
    }

    /// There is nothing to remember for the user list, so this always reloads.
    pub async fn retry(&self) {
        self.load().await;
    }

    pub fn state(&self) -> ViewState<User> {
        self.slot.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<User>> {
        self.slot.subscribe()
    }
}

/// Owns the todo-list `ViewState` for the selected user.
pub struct TodosContainer<S> {
    source: S,
    slot: Slot<Todo>,
    selected: Mutex<Option<UserId>>,
}

impl<S: DataSource> TodosContainer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            slot: Slot::new(),
            selected: Mutex::new(None),
        }
    }

    /// The user passed to the most recent `load`, if any.
    pub fn selected_user(&self) -> Option<UserId> {
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn load(&self, user_id: UserId) {
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner) = Some(user_id);
        let ticket = self.slot.begin();
        tracing::debug!(ticket = ticket.raw(), user_id, "loading todos");
        let result = self.source.list_todos(user_id).await;
        self.slot.finish("todos", ticket, result, TODOS_FALLBACK_MESSAGE);
    }

    /// Reload the last selected user. Without a selection the container goes
    /// straight to `Error` and the data source is not called.
    pub async fn retry(&self) {
        match self.selected_user() {
            Some(user_id) => self.load(user_id).await,
            None => {
                tracing::warn!("retry with no user selected");
                self.slot.fail(NO_SELECTION_MESSAGE);
            }
        }
    }

    pub fn state(&self) -> ViewState<Todo> {
        self.slot.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<Todo>> {
        self.slot.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        calls: AtomicUsize,
        fail: bool,
    }

    impl Fixed {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl DataSource for Fixed {
        async fn list_users(&self) -> Result<Vec<User>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ApiError::Transport(String::new()))
            } else {
                Ok(Vec::new())
            }
        }

        async fn list_todos(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ApiError::Transport(String::new()));
            }
            Ok(vec![Todo {
                id: 1,
                user_id,
                title: "A".into(),
                completed: false,
            }])
        }
    }

    #[tokio::test]
    async fn users_error_without_message_uses_users_fallback() {
        let container = UsersContainer::new(Fixed::failing());
        container.load().await;
        assert_eq!(container.state().error(), Some(USERS_FALLBACK_MESSAGE));
    }

    #[tokio::test]
    async fn todos_error_without_message_uses_todos_fallback() {
        let container = TodosContainer::new(Fixed::failing());
        container.load(3).await;
        assert_eq!(container.state().error(), Some(TODOS_FALLBACK_MESSAGE));
    }

    #[tokio::test]
    async fn todos_retry_reuses_selected_user() {
        let container = TodosContainer::new(Fixed::ok());
        container.load(9).await;
        container.retry().await;
        assert_eq!(container.selected_user(), Some(9));
        assert_eq!(container.source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(container.state().items().map(|t| t[0].user_id), Some(9));
    }

    #[tokio::test]
    async fn subscriber_sees_loading_then_result() {
        let container = UsersContainer::new(Fixed::ok());
        let mut rx = container.subscribe();
        container.load().await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ViewState::Success(Vec::new()));
    }
}
