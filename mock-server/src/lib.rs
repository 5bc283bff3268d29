use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(rename = "catchPhrase")]
    pub catch_phrase: String,
    pub bs: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
    pub company: Company,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    #[serde(rename = "userId")]
    pub user_id: u32,
    pub id: u32,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct TodoFilter {
    #[serde(rename = "userId")]
    pub user_id: Option<u32>,
}

/// The data served by the mock API. Read-only once the router is built.
#[derive(Clone, Debug, Default)]
pub struct Fixtures {
    pub users: Vec<User>,
    pub todos: Vec<Todo>,
}

pub type Db = Arc<Fixtures>;

impl Fixtures {
    /// Three users with a handful of todos each, modelled on JSONPlaceholder.
    pub fn seed() -> Self {
        let users = vec![
            user(1, "Leanne Graham", "Bret", "Sincere@april.biz", "Gwenborough", "Romaguera-Crona"),
            user(2, "Ervin Howell", "Antonette", "Shanna@melissa.tv", "Wisokyburgh", "Deckow-Crist"),
            user(3, "Clementine Bauch", "Samantha", "Nathan@yesenia.net", "McKenziehaven", "Romaguera-Jacobson"),
        ];
        let todos = vec![
            todo(1, 1, "delectus aut autem", false),
            todo(1, 2, "quis ut nam facilis et officia qui", false),
            todo(1, 3, "fugiat veniam minus", false),
            todo(1, 4, "et porro tempora", true),
            todo(2, 21, "suscipit repellat esse quibusdam voluptatem incidunt", false),
            todo(2, 22, "distinctio vitae autem nihil ut molestias quo", true),
            todo(3, 41, "aliquid amet impedit consequatur aspernatur placeat eaque fugiat suscipit", false),
        ];
        Self { users, todos }
    }
}

fn user(id: u32, name: &str, username: &str, email: &str, city: &str, company: &str) -> User {
    User {
        id,
        name: name.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        address: Address {
            street: "Kulas Light".to_string(),
            suite: format!("Apt. {}", 550 + id),
            city: city.to_string(),
            zipcode: "92998-3874".to_string(),
            geo: Geo {
                lat: "-37.3159".to_string(),
                lng: "81.1496".to_string(),
            },
        },
        phone: format!("1-770-736-80{id:02}"),
        website: "hildegard.org".to_string(),
        company: Company {
            name: company.to_string(),
            catch_phrase: "Multi-layered client-server neural-net".to_string(),
            bs: "harness real-time e-markets".to_string(),
        },
    }
}

fn todo(user_id: u32, id: u32, title: &str, completed: bool) -> Todo {
    Todo {
        user_id,
        id,
        title: title.to_string(),
        completed,
    }
}

pub fn app() -> Router {
    app_with(Fixtures::seed())
}

pub fn app_with(fixtures: Fixtures) -> Router {
    let db: Db = Arc::new(fixtures);
    Router::new()
        .route("/users", get(list_users))
        .route("/todos", get(list_todos))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, fixtures: Fixtures) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(fixtures)).await
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    tracing::debug!(count = db.users.len(), "GET /users");
    Json(db.users.clone())
}

/// `userId` filters by owner; without it every todo is returned. Order is
/// the fixture order either way.
async fn list_todos(State(db): State<Db>, Query(filter): Query<TodoFilter>) -> Json<Vec<Todo>> {
    let todos: Vec<Todo> = db
        .todos
        .iter()
        .filter(|t| filter.user_id.is_none_or(|id| t.user_id == id))
        .cloned()
        .collect();
    tracing::debug!(user_id = ?filter.user_id, count = todos.len(), "GET /todos");
    Json(todos)
}
