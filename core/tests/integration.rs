//! Browse users and todos against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then plays the part of a host
//! that does its own IO: requests built by `TodosClient` are executed with
//! ureq and the raw responses handed back to the `parse_*` methods.

use todos_core::{ApiError, HttpMethod, HttpResponse, TodosClient};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data and the core decides what they mean.
fn execute(req: todos_core::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut builder = match req.method {
        HttpMethod::Get => agent.get(&req.path),
    };
    for (key, value) in &req.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    let mut response = builder.call().expect("HTTP transport error");

    let status = response.status();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    }
}

fn start_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn browse_users_then_todos() {
    let addr = start_server();
    let client = TodosClient::new(&format!("http://{addr}/"));

    // Step 1: list users in server order.
    let users = client
        .parse_list_users(execute(client.build_list_users()))
        .unwrap();
    let ids: Vec<u32> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(users[0].company.name, "Romaguera-Crona");

    // Step 2: todos for the first user, all owned by that user.
    let todos = client
        .parse_list_todos(execute(client.build_list_todos(users[0].id)))
        .unwrap();
    assert_eq!(todos.len(), 4);
    assert!(todos.iter().all(|t| t.user_id == 1));
    assert_eq!(todos[3].title, "et porro tempora");
    assert!(todos[3].completed);

    // Step 3: a user with no todos yields an empty list, not an error.
    let todos = client
        .parse_list_todos(execute(client.build_list_todos(42)))
        .unwrap();
    assert!(todos.is_empty());

    // Step 4: a path the server does not know maps to an HTTP error.
    let mut req = client.build_list_users();
    req.path = format!("http://{addr}/people");
    let err = client.parse_list_users(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));
    assert_eq!(err.to_string(), "HTTP Error: 404 - Not Found");
}
