//! What a screen currently shows, and the sans-IO machine that writes it.
//!
//! # Design
//! `Screen` owns one `ViewState` plus a generation counter. Every load takes
//! a `LoadTicket`; a completion is applied only while its ticket is the
//! pending one, so a superseded request can never overwrite a newer
//! `Loading` or result. The async containers and the FFI screen handle both
//! drive this type.

use serde::Serialize;

use crate::error::ApiError;

/// The state of one screen. Starts at `Loading`; every write replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    Loading,
    /// Items in the order the data source returned them.
    Success(Vec<T>),
    /// A human-readable message, never empty.
    Error(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn items(&self) -> Option<&[T]> {
        match self {
            ViewState::Success(items) => Some(items),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Loading
    }
}

/// Generation of one load. Only the most recent ticket can complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn from_raw(generation: u64) -> Self {
        Self(generation)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Screen<T> {
    state: ViewState<T>,
    generation: u64,
    pending: Option<u64>,
}

impl<T> Default for Screen<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Screen<T> {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            generation: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// Switch to `Loading` and hand out the ticket for this load. Any ticket
    /// issued earlier becomes stale.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.pending = Some(self.generation);
        self.state = ViewState::Loading;
        LoadTicket(self.generation)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.pending == Some(ticket.0)
    }

    /// Apply the outcome of the load identified by `ticket`. Returns `false`
    /// and leaves the state untouched when the ticket is stale or already
    /// completed. `fallback` is the message for errors that carry none.
    pub fn finish(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<T>, ApiError>,
        fallback: &str,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.pending = None;
        self.state = match result {
            Ok(items) => ViewState::Success(items),
            Err(err) => ViewState::Error(err.user_message(fallback)),
        };
        true
    }

    /// Fail without a load, e.g. a retry with nothing to retry. Supersedes
    /// any load still in flight.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.generation += 1;
        self.pending = None;
        self.state = ViewState::Error(message.into());
    }
}
