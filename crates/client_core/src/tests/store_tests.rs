use super::*;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Default)]
struct FakeApi {
    todos: Vec<Todo>,
    next_id: i64,
    list_queries: Vec<i64>,
    created: Vec<NewTodo>,
    patches: Vec<(i64, TodoPatch)>,
    failing_delete: Option<i64>,
}

type SharedApi = Arc<Mutex<FakeApi>>;

#[derive(Deserialize)]
struct OwnerQuery {
    #[serde(rename = "userId")]
    user_id: i64,
}

async fn list_todos(
    State(api): State<SharedApi>,
    Query(query): Query<OwnerQuery>,
) -> Json<Vec<Todo>> {
    let mut api = api.lock().await;
    api.list_queries.push(query.user_id);
    let todos = api
        .todos
        .iter()
        .filter(|todo| todo.user_id.0 == query.user_id)
        .cloned()
        .collect();
    Json(todos)
}

async fn create_todo(
    State(api): State<SharedApi>,
    Json(body): Json<NewTodo>,
) -> (StatusCode, Json<Todo>) {
    let mut api = api.lock().await;
    api.next_id += 1;
    let todo = Todo {
        id: TodoId(api.next_id),
        user_id: body.user_id,
        title: body.title.clone(),
        completed: body.completed,
    };
    api.created.push(body);
    api.todos.push(todo.clone());
    (StatusCode::CREATED, Json(todo))
}

async fn delete_todo(State(api): State<SharedApi>, Path(id): Path<i64>) -> StatusCode {
    let mut api = api.lock().await;
    if api.failing_delete == Some(id) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let before = api.todos.len();
    api.todos.retain(|todo| todo.id.0 != id);
    if api.todos.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

async fn update_todo(
    State(api): State<SharedApi>,
    Path(id): Path<i64>,
    Json(patch): Json<TodoPatch>,
) -> Result<Json<Todo>, StatusCode> {
    let mut api = api.lock().await;
    api.patches.push((id, patch.clone()));
    let todo = api
        .todos
        .iter_mut()
        .find(|todo| todo.id.0 == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = patch.title {
        todo.title = title;
    }
    if let Some(completed) = patch.completed {
        todo.completed = completed;
    }
    Ok(Json(todo.clone()))
}

async fn spawn_todo_server(api: SharedApi) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/:id", patch(update_todo).delete(delete_todo))
        .with_state(api);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn seeded(todos: Vec<Todo>) -> SharedApi {
    let next_id = todos.iter().map(|todo| todo.id.0).max().unwrap_or(0);
    Arc::new(Mutex::new(FakeApi {
        todos,
        next_id,
        ..FakeApi::default()
    }))
}

fn todo(id: i64, owner: i64, title: &str, completed: bool) -> Todo {
    Todo {
        id: TodoId(id),
        user_id: OwnerId(owner),
        title: title.to_string(),
        completed,
    }
}

#[tokio::test]
async fn list_requests_only_the_owners_todos() {
    let api = seeded(vec![
        todo(1, 7, "mine", false),
        todo(2, 8, "someone else's", false),
        todo(3, 7, "also mine", true),
    ]);
    let server_url = spawn_todo_server(api.clone()).await.expect("spawn server");
    let store = HttpTodoStore::new(format!("{server_url}/"), OwnerId(7));

    let todos = store.list().await.expect("list");

    assert_eq!(
        todos.iter().map(|t| t.id.0).collect::<Vec<_>>(),
        vec![1, 3]
    );
    assert_eq!(api.lock().await.list_queries, vec![7]);
}

#[tokio::test]
async fn create_posts_title_owner_and_incomplete_flag() {
    let api = seeded(vec![todo(4, 7, "existing", false)]);
    let server_url = spawn_todo_server(api.clone()).await.expect("spawn server");
    let store = HttpTodoStore::new(server_url, OwnerId(7));

    let created = store
        .create(&NewTodo::new(OwnerId(7), "water plants"))
        .await
        .expect("create");

    assert_eq!(created, todo(5, 7, "water plants", false));
    assert_eq!(
        api.lock().await.created,
        vec![NewTodo::new(OwnerId(7), "water plants")]
    );
}

#[tokio::test]
async fn delete_succeeds_on_2xx_and_fails_otherwise() {
    let api = seeded(vec![todo(1, 7, "a", true), todo(2, 7, "b", true)]);
    api.lock().await.failing_delete = Some(2);
    let server_url = spawn_todo_server(api.clone()).await.expect("spawn server");
    let store = HttpTodoStore::new(server_url, OwnerId(7));

    store.delete(TodoId(1)).await.expect("delete 1");
    let err = store.delete(TodoId(2)).await.expect_err("delete 2 must fail");
    assert!(err.to_string().contains("500"), "unexpected error: {err:#}");
    assert!(store.delete(TodoId(99)).await.is_err());

    let remaining = api.lock().await.todos.clone();
    assert_eq!(remaining, vec![todo(2, 7, "b", true)]);
}

#[tokio::test]
async fn update_patches_only_given_fields() {
    let api = seeded(vec![todo(3, 7, "draft", false)]);
    let server_url = spawn_todo_server(api.clone()).await.expect("spawn server");
    let store = HttpTodoStore::new(server_url, OwnerId(7));

    let updated = store
        .update(
            TodoId(3),
            &TodoPatch {
                completed: Some(true),
                ..TodoPatch::default()
            },
        )
        .await
        .expect("update");

    assert_eq!(updated, todo(3, 7, "draft", true));
    let patches = api.lock().await.patches.clone();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].1.title, None);
}

#[tokio::test]
async fn unreachable_server_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let store = HttpTodoStore::new(format!("http://{addr}"), OwnerId(7));
    assert!(store.list().await.is_err());
}

#[tokio::test]
async fn from_settings_requires_an_owner() {
    let settings = Settings::default();
    let err = HttpTodoStore::from_settings(&settings)
        .err()
        .expect("missing owner must fail");
    assert!(err.to_string().contains("owner id"));

    let settings = Settings {
        api_url: "http://127.0.0.1:9/api/".to_string(),
        owner_id: Some(3),
        ..Settings::default()
    };
    let store = HttpTodoStore::from_settings(&settings).expect("store");
    assert_eq!(store.owner(), OwnerId(3));
    assert_eq!(store.api_url(), "http://127.0.0.1:9/api");
}
