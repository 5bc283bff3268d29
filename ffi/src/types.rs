//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Nested user fields are flattened.
//! Conversion and release helpers live here to keep `lib.rs` focused on
//! the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use todos_core::error::ApiError;
use todos_core::http::HttpMethod;
use todos_core::{Screen, Todo, User, UserId};

/// Opaque handle to a `TodosClient`.
pub struct FfiTodosClient {
    pub(crate) inner: todos_core::TodosClient,
}

/// Opaque handle to one screen's state machine.
pub struct FfiScreen {
    pub(crate) inner: ScreenInner,
}

pub(crate) enum ScreenInner {
    Users(Screen<User>),
    Todos {
        screen: Screen<Todo>,
        selected: Option<UserId>,
    },
}

/// Which list a screen shows.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FfiScreenKind {
    Users = 0,
    Todos = 1,
}

/// Current variant of a screen's state.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FfiViewStateTag {
    Loading = 0,
    Success = 1,
    Error = 2,
}

pub(crate) fn c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

/// Release a string produced by `c_string`. Null is ignored.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Move a vector onto the heap for C, returning `(ptr, len)`. Empty
/// vectors become a null pointer.
fn leak_vec<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let boxed = items.into_boxed_slice();
    let len = boxed.len() as u32;
    (Box::into_raw(boxed) as *mut T, len)
}

/// Take back a vector produced by `leak_vec`.
unsafe fn reclaim_vec<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// The C caller executes the request and passes the response back through
/// `todos_parse_*` or `todos_screen_finish`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: todos_core::HttpRequest) -> *mut Self {
        let (headers, headers_len) = leak_vec(
            req.headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect(),
        );
        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: c_string(req.path),
            headers,
            headers_len,
            body: req.body.map_or(std::ptr::null_mut(), c_string),
        }))
    }

    pub(crate) unsafe fn release(req: *mut Self) {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        for h in unsafe { reclaim_vec(req.headers, req.headers_len) } {
            free_c_string(h.key);
            free_c_string(h.value);
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this after executing a request. The FFI layer
/// reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiTodosResult`, and accepted by
/// `todos_screen_fail` to describe a host-side transport failure.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Connectivity = 1,
    Timeout = 2,
    EmptyResponse = 3,
    Http = 4,
    Deserialization = 5,
    Transport = 6,
    Panic = 7,
    NullArg = 8,
}

/// Tag that tells `todos_free_result` what `FfiTodosResult::data` points to.
#[repr(C)]
pub enum FfiDataTag {
    None = 0,
    UserList = 1,
    TodoList = 2,
}

/// A user exposed to C, with address and company flattened.
#[repr(C)]
pub struct FfiUser {
    pub id: u32,
    pub name: *mut c_char,
    pub username: *mut c_char,
    pub email: *mut c_char,
    pub phone: *mut c_char,
    pub website: *mut c_char,
    pub street: *mut c_char,
    pub suite: *mut c_char,
    pub city: *mut c_char,
    pub zipcode: *mut c_char,
    pub lat: *mut c_char,
    pub lng: *mut c_char,
    pub company_name: *mut c_char,
    pub company_catch_phrase: *mut c_char,
    pub company_bs: *mut c_char,
}

impl From<User> for FfiUser {
    fn from(u: User) -> Self {
        FfiUser {
            id: u.id,
            name: c_string(u.name),
            username: c_string(u.username),
            email: c_string(u.email),
            phone: c_string(u.phone),
            website: c_string(u.website),
            street: c_string(u.address.street),
            suite: c_string(u.address.suite),
            city: c_string(u.address.city),
            zipcode: c_string(u.address.zipcode),
            lat: c_string(u.address.geo.lat),
            lng: c_string(u.address.geo.lng),
            company_name: c_string(u.company.name),
            company_catch_phrase: c_string(u.company.catch_phrase),
            company_bs: c_string(u.company.bs),
        }
    }
}

impl FfiUser {
    fn free_fields(&self) {
        for s in [
            self.name,
            self.username,
            self.email,
            self.phone,
            self.website,
            self.street,
            self.suite,
            self.city,
            self.zipcode,
            self.lat,
            self.lng,
            self.company_name,
            self.company_catch_phrase,
            self.company_bs,
        ] {
            free_c_string(s);
        }
    }
}

/// A single todo item exposed to C.
#[repr(C)]
pub struct FfiTodo {
    pub id: u32,
    pub user_id: u32,
    pub title: *mut c_char,
    pub completed: bool,
}

impl From<Todo> for FfiTodo {
    fn from(t: Todo) -> Self {
        FfiTodo {
            id: t.id,
            user_id: t.user_id,
            title: c_string(t.title),
            completed: t.completed,
        }
    }
}

#[repr(C)]
pub struct FfiUserList {
    pub items: *mut FfiUser,
    pub len: u32,
}

#[repr(C)]
pub struct FfiTodoList {
    pub items: *mut FfiTodo,
    pub len: u32,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`). On failure
/// `error_message` holds the text a screen would show and `data` is null.
#[repr(C)]
pub struct FfiTodosResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiTodosResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        http_status: u16,
        data_tag: FfiDataTag,
        data: *mut c_void,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiTodosResult {
            error_code,
            error_message,
            http_status,
            data_tag,
            data,
        }))
    }

    pub(crate) fn ok_users(users: Vec<User>) -> *mut Self {
        let (items, len) = leak_vec(users.into_iter().map(FfiUser::from).collect());
        let list = Box::into_raw(Box::new(FfiUserList { items, len }));
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            FfiDataTag::UserList,
            list as *mut c_void,
        )
    }

    pub(crate) fn ok_todos(todos: Vec<Todo>) -> *mut Self {
        let (items, len) = leak_vec(todos.into_iter().map(FfiTodo::from).collect());
        let list = Box::into_raw(Box::new(FfiTodoList { items, len }));
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            FfiDataTag::TodoList,
            list as *mut c_void,
        )
    }

    /// Build an error result from an `ApiError`. `fallback` is the screen's
    /// message for errors without one.
    pub(crate) fn from_error(err: ApiError, fallback: &str) -> *mut Self {
        let http_status = match &err {
            ApiError::Http { status, .. } => *status,
            _ => 0,
        };
        let code = error_code(&err);
        Self::boxed(
            code,
            c_string(err.user_message(fallback)),
            http_status,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            c_string(format!("null argument: {name}")),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Panic,
            c_string(msg),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    pub(crate) unsafe fn release(result: *mut Self) {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::UserList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiUserList) };
                for user in unsafe { reclaim_vec(list.items, list.len) } {
                    user.free_fields();
                }
            }
            FfiDataTag::TodoList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiTodoList) };
                for todo in unsafe { reclaim_vec(list.items, list.len) } {
                    free_c_string(todo.title);
                }
            }
            FfiDataTag::None => {}
        }
    }
}

pub(crate) fn error_code(err: &ApiError) -> FfiErrorCode {
    match err {
        ApiError::Connectivity(_) => FfiErrorCode::Connectivity,
        ApiError::Timeout(_) => FfiErrorCode::Timeout,
        ApiError::EmptyResponse => FfiErrorCode::EmptyResponse,
        ApiError::Http { .. } => FfiErrorCode::Http,
        ApiError::Deserialization(_) => FfiErrorCode::Deserialization,
        ApiError::Transport(_) => FfiErrorCode::Transport,
    }
}

/// The error a host reports after its own transport failed.
pub(crate) fn host_error(code: FfiErrorCode, message: String) -> ApiError {
    match code {
        FfiErrorCode::Connectivity => ApiError::Connectivity(message),
        FfiErrorCode::Timeout => ApiError::Timeout(message),
        FfiErrorCode::EmptyResponse => ApiError::EmptyResponse,
        _ => ApiError::Transport(message),
    }
}
