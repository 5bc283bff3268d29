//! C-ABI wrapper around `todos-core` for a mobile host.
//!
//! # Overview
//! The host owns the network. It asks this library for the request to send,
//! executes it, and hands the raw response back, either to a stateless
//! `todos_parse_*` function or to a screen handle that tracks the
//! Loading / Success / Error state of one list.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Screen loads hand out a ticket. Only the latest ticket can complete, so
//!   a slow response to an earlier load cannot overwrite a newer one.
//! - The C caller owns all returned pointers and must call the matching
//!   `todos_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use todos_core::error::{NO_SELECTION_MESSAGE, TODOS_FALLBACK_MESSAGE, USERS_FALLBACK_MESSAGE};
use todos_core::http::HttpResponse;
use todos_core::render::{render_todos, render_users};
use todos_core::{LoadTicket, Screen, ViewState};

use types::*;

/// Read a borrowed C string. Null and invalid UTF-8 read as empty.
fn read_str<'a>(s: *const c_char) -> &'a str {
    if s.is_null() {
        return "";
    }
    unsafe { CStr::from_ptr(s) }.to_str().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client bound to `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `todos_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todos_client_new(base_url: *const c_char) -> *mut FfiTodosClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let client = todos_core::TodosClient::new(read_str(base_url));
        Box::into_raw(Box::new(FfiTodosClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `todos_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todos_client_free(client: *mut FfiTodosClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the request for `GET /users`.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `todos_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn todos_build_list_users(client: *const FfiTodosClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_users())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for `GET /todos?userId={user_id}`.
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn todos_build_list_todos(
    client: *const FfiTodosClient,
    user_id: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_todos(user_id))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse::new(resp.status, read_str(resp.body))
}

/// Parse the response to a list-users request.
///
/// Returns a result with `data_tag = UserList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todos_parse_list_users(
    client: *const FfiTodosClient,
    response: *const FfiHttpResponse,
) -> *mut FfiTodosResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiTodosResult::null_arg("client");
        }
        if response.is_null() {
            return FfiTodosResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.parse_list_users(ffi_response_to_core(resp)) {
            Ok(users) => FfiTodosResult::ok_users(users),
            Err(e) => FfiTodosResult::from_error(e, USERS_FALLBACK_MESSAGE),
        }
    })
    .unwrap_or_else(|_| FfiTodosResult::panic("panic in todos_parse_list_users"))
}

/// Parse the response to a list-todos request.
///
/// Returns a result with `data_tag = TodoList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todos_parse_list_todos(
    client: *const FfiTodosClient,
    response: *const FfiHttpResponse,
) -> *mut FfiTodosResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiTodosResult::null_arg("client");
        }
        if response.is_null() {
            return FfiTodosResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.parse_list_todos(ffi_response_to_core(resp)) {
            Ok(todos) => FfiTodosResult::ok_todos(todos),
            Err(e) => FfiTodosResult::from_error(e, TODOS_FALLBACK_MESSAGE),
        }
    })
    .unwrap_or_else(|_| FfiTodosResult::panic("panic in todos_parse_list_todos"))
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

/// Create a screen in the `Loading` state.
/// The caller must free it with `todos_screen_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todos_screen_new(kind: FfiScreenKind) -> *mut FfiScreen {
    catch_unwind(|| {
        let inner = match kind {
            FfiScreenKind::Users => ScreenInner::Users(Screen::new()),
            FfiScreenKind::Todos => ScreenInner::Todos {
                screen: Screen::new(),
                selected: None,
            },
        };
        Box::into_raw(Box::new(FfiScreen { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a screen. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todos_screen_free(screen: *mut FfiScreen) {
    if !screen.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(screen) });
        });
    }
}

/// Start a load on a users screen. The screen switches to `Loading`, the
/// ticket is written to `ticket_out`, and the request to execute is returned.
///
/// Returns null if an argument is null or the screen is not a users screen.
#[unsafe(no_mangle)]
pub extern "C" fn todos_screen_load_users(
    screen: *mut FfiScreen,
    client: *const FfiTodosClient,
    ticket_out: *mut u64,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() || client.is_null() || ticket_out.is_null() {
            return std::ptr::null_mut();
        }
        let (screen, client) = unsafe { (&mut *screen, &*client) };
        let ScreenInner::Users(users) = &mut screen.inner else {
            return std::ptr::null_mut();
        };
        let ticket = users.begin();
        unsafe { *ticket_out = ticket.raw() };
        FfiHttpRequest::from_core(client.inner.build_list_users())
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Start a load of `user_id`'s todos on a todos screen and remember the
/// selection for `todos_screen_retry`.
///
/// Returns null if an argument is null or the screen is not a todos screen.
#[unsafe(no_mangle)]
pub extern "C" fn todos_screen_load_todos(
    screen: *mut FfiScreen,
    client: *const FfiTodosClient,
    user_id: u32,
    ticket_out: *mut u64,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() || client.is_null() || ticket_out.is_null() {
            return std::ptr::null_mut();
        }
        let (screen, client) = unsafe { (&mut *screen, &*client) };
        let ScreenInner::Todos {
            screen: todos,
            selected,
        } = &mut screen.inner
        else {
            return std::ptr::null_mut();
        };
        *selected = Some(user_id);
        let ticket = todos.begin();
        unsafe { *ticket_out = ticket.raw() };
        FfiHttpRequest::from_core(client.inner.build_list_todos(user_id))
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Repeat the last load. On a todos screen with no selection the screen
/// moves to `Error` and null is returned: there is nothing to send.
#[unsafe(no_mangle)]
pub extern "C" fn todos_screen_retry(
    screen: *mut FfiScreen,
    client: *const FfiTodosClient,
    ticket_out: *mut u64,
) -> *mut FfiHttpRequest {
    if screen.is_null() {
        return std::ptr::null_mut();
    }
    let selected = match &unsafe { &*screen }.inner {
        ScreenInner::Users(_) => return todos_screen_load_users(screen, client, ticket_out),
        ScreenInner::Todos { selected, .. } => *selected,
    };
    match selected {
        Some(user_id) => todos_screen_load_todos(screen, client, user_id, ticket_out),
        None => {
            let _ = catch_unwind(AssertUnwindSafe(|| {
                if let ScreenInner::Todos { screen: todos, .. } = &mut unsafe { &mut *screen }.inner
                {
                    todos.fail(NO_SELECTION_MESSAGE);
                }
            }));
            std::ptr::null_mut()
        }
    }
}

/// Complete the load identified by `ticket` with the host's HTTP response.
///
/// Returns true if the screen changed; false for a stale ticket or a null
/// argument.
#[unsafe(no_mangle)]
pub extern "C" fn todos_screen_finish(
    screen: *mut FfiScreen,
    client: *const FfiTodosClient,
    ticket: u64,
    response: *const FfiHttpResponse,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() || client.is_null() || response.is_null() {
            return false;
        }
        let (screen, client, resp) = unsafe { (&mut *screen, &*client, &*response) };
        let ticket = LoadTicket::from_raw(ticket);
        let resp = ffi_response_to_core(resp);
        match &mut screen.inner {
            ScreenInner::Users(users) => users.finish(
                ticket,
                client.inner.parse_list_users(resp),
                USERS_FALLBACK_MESSAGE,
            ),
            ScreenInner::Todos { screen: todos, .. } => todos.finish(
                ticket,
                client.inner.parse_list_todos(resp),
                TODOS_FALLBACK_MESSAGE,
            ),
        }
    }))
    .unwrap_or(false)
}

/// Complete the load identified by `ticket` with a transport failure seen by
/// the host (`Connectivity`, `Timeout`, or anything else as `Transport`).
/// `message` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn todos_screen_fail(
    screen: *mut FfiScreen,
    ticket: u64,
    code: FfiErrorCode,
    message: *const c_char,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return false;
        }
        let screen = unsafe { &mut *screen };
        let ticket = LoadTicket::from_raw(ticket);
        let err = host_error(code, read_str(message).to_string());
        match &mut screen.inner {
            ScreenInner::Users(users) => users.finish(ticket, Err(err), USERS_FALLBACK_MESSAGE),
            ScreenInner::Todos { screen: todos, .. } => {
                todos.finish(ticket, Err(err), TODOS_FALLBACK_MESSAGE)
            }
        }
    }))
    .unwrap_or(false)
}

fn state_tag<T>(state: &ViewState<T>) -> FfiViewStateTag {
    match state {
        ViewState::Loading => FfiViewStateTag::Loading,
        ViewState::Success(_) => FfiViewStateTag::Success,
        ViewState::Error(_) => FfiViewStateTag::Error,
    }
}

/// Which variant the screen currently shows. A null screen reads as `Loading`.
#[unsafe(no_mangle)]
pub extern "C" fn todos_screen_state(screen: *const FfiScreen) -> FfiViewStateTag {
    if screen.is_null() {
        return FfiViewStateTag::Loading;
    }
    catch_unwind(|| match &unsafe { &*screen }.inner {
        ScreenInner::Users(users) => state_tag(users.state()),
        ScreenInner::Todos { screen: todos, .. } => state_tag(todos.state()),
    })
    .unwrap_or(FfiViewStateTag::Loading)
}

/// The full state as JSON: `{"state":"loading"}`,
/// `{"state":"success","data":[...]}` or `{"state":"error","data":"..."}`.
///
/// Returns null if `screen` is null. Free with `todos_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn todos_screen_state_json(screen: *const FfiScreen) -> *mut c_char {
    catch_unwind(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let json = match &unsafe { &*screen }.inner {
            ScreenInner::Users(users) => serde_json::to_string(users.state()),
            ScreenInner::Todos { screen: todos, .. } => serde_json::to_string(todos.state()),
        };
        json.map_or(std::ptr::null_mut(), c_string)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// The screen rendered as newline-separated text.
///
/// Returns null if `screen` is null. Free with `todos_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn todos_screen_render(screen: *const FfiScreen) -> *mut c_char {
    catch_unwind(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let lines = match &unsafe { &*screen }.inner {
            ScreenInner::Users(users) => render_users(users.state()),
            ScreenInner::Todos { screen: todos, .. } => render_todos(todos.state()),
        };
        c_string(lines.join("\n"))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by a `todos_build_*` or `todos_screen_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todos_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiHttpRequest::release(req) });
}

/// Free a result returned by a `todos_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn todos_free_result(result: *mut FfiTodosResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiTodosResult::release(result) });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todos_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| free_c_string(s));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
