//! Default rules for the to-do front end
//!
//! | alias           | method | pattern                 | response               |
//! |-----------------|--------|-------------------------|------------------------|
//! | `tasks_of_user` | GET    | `**/tasks/ofuser/*`     | 200, array of tasks    |
//! | `task_by_id`    | GET    | `**/tasks/byid/*`       | 200, task              |
//! | `todo_create`   | POST   | `**/todos/create`       | 201, `{"ok": true}`    |
//! | `todo_toggle`   | PUT    | `**/todos/byid/*`       | 200, `{"ok": true}`    |
//! | `todo_delete`   | DELETE | `**/todos/byid/*`       | 200, `{"ok": true}`    |

use axum::http::Method;
use tracing::debug;

use todo_core::ResourceStore;

use crate::error::ApiError;
use crate::interceptor::Interceptor;
use crate::pattern::RouteMatch;
use crate::request::{InterceptedRequest, MockResponse};
use crate::rules::{HandlerResult, RuleError, RuleId};
use crate::serialization::{serialize_task, serialize_tasks};

pub const TASKS_OF_USER: &str = "tasks_of_user";
pub const TASK_BY_ID: &str = "task_by_id";
pub const TODO_CREATE: &str = "todo_create";
pub const TODO_TOGGLE: &str = "todo_toggle";
pub const TODO_DELETE: &str = "todo_delete";

/// Form fields naming the target task of a create, in lookup order
const TASK_ID_FIELDS: &[&str] = &["taskid", "taskId"];

/// Ids of the installed to-do rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoRoutes {
    pub tasks_of_user: RuleId,
    pub task_by_id: RuleId,
    pub todo_create: RuleId,
    pub todo_toggle: RuleId,
    pub todo_delete: RuleId,
}

/// Register the five to-do rules on `interceptor`
pub fn install_todo_routes<S>(interceptor: &mut Interceptor<S>) -> Result<TodoRoutes, RuleError>
where
    S: ResourceStore + 'static,
{
    Ok(TodoRoutes {
        tasks_of_user: interceptor.register(
            Method::GET,
            "**/tasks/ofuser/*",
            TASKS_OF_USER,
            list_tasks_of_user::<S>,
        )?,
        task_by_id: interceptor.register(Method::GET, "**/tasks/byid/*", TASK_BY_ID, get_task::<S>)?,
        todo_create: interceptor.register(
            Method::POST,
            "**/todos/create",
            TODO_CREATE,
            create_todo::<S>,
        )?,
        todo_toggle: interceptor.register(
            Method::PUT,
            "**/todos/byid/*",
            TODO_TOGGLE,
            toggle_todo::<S>,
        )?,
        todo_delete: interceptor.register(
            Method::DELETE,
            "**/todos/byid/*",
            TODO_DELETE,
            delete_todo::<S>,
        )?,
    })
}

fn id_segment(route: &RouteMatch) -> Result<&str, ApiError> {
    route
        .last_segment()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::NotFound("Request path has no id segment".to_string()))
}

fn list_tasks_of_user<S: ResourceStore>(
    store: &mut S,
    _request: &InterceptedRequest,
    route: &RouteMatch,
) -> HandlerResult {
    let user_id = id_segment(route)?;
    let tasks = store.list_tasks_of_user(user_id)?;
    Ok(MockResponse::ok(serialize_tasks(&tasks)?))
}

fn get_task<S: ResourceStore>(
    store: &mut S,
    _request: &InterceptedRequest,
    route: &RouteMatch,
) -> HandlerResult {
    let task_id = id_segment(route)?;
    let task = store.get_task(task_id)?;
    Ok(MockResponse::ok(serialize_task(&task)?))
}

fn create_todo<S: ResourceStore>(
    store: &mut S,
    request: &InterceptedRequest,
    _route: &RouteMatch,
) -> HandlerResult {
    let form = request.form()?;
    let description = form.get_or_empty("description");

    let task_id = match form.first_of(TASK_ID_FIELDS) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => sole_task_id(store)?,
    };

    let todo_id = store.create_todo(&task_id, description)?;
    debug!(task_id = %task_id, todo_id = %todo_id, "Created to-do");
    Ok(MockResponse::created_ack())
}

/// The create form may omit the task id when only one task exists
fn sole_task_id<S: ResourceStore>(store: &S) -> Result<String, ApiError> {
    match store.all_tasks().as_slice() {
        [task] => Ok(task.task_id().to_string()),
        tasks => Err(ApiError::Validation(format!(
            "Field 'taskid' is required when the store holds {} tasks",
            tasks.len()
        ))),
    }
}

fn toggle_todo<S: ResourceStore>(
    store: &mut S,
    request: &InterceptedRequest,
    route: &RouteMatch,
) -> HandlerResult {
    // The body carries the client's view of the new state; the store flips
    // regardless, but a malformed body is still a bad request
    request.form()?;
    let todo_id = id_segment(route)?;
    store.toggle_todo(todo_id)?;
    Ok(MockResponse::ack())
}

fn delete_todo<S: ResourceStore>(
    store: &mut S,
    _request: &InterceptedRequest,
    route: &RouteMatch,
) -> HandlerResult {
    let todo_id = id_segment(route)?;
    store.delete_todo(todo_id)?;
    Ok(MockResponse::ack())
}
