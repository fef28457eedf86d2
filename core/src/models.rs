use serde::{Deserialize, Serialize};

/// Identifier wrapper used by the real backend's JSON encoding.
///
/// The backend serializes every document id as an object holding the raw id
/// under the `$oid` key, e.g. `{"$oid": "stub_task_1"}`. UI code parses this
/// shape directly, so snapshots must reproduce it exactly.
///
/// # Examples
///
/// ```rust
/// use todo_core::models::ObjectId;
///
/// let id = ObjectId::new("stub_task_1");
/// let json = serde_json::to_value(&id).unwrap();
/// assert_eq!(json, serde_json::json!({ "$oid": "stub_task_1" }));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ObjectId {
    #[serde(rename = "$oid")]
    pub oid: String,
}

impl ObjectId {
    pub fn new(oid: impl Into<String>) -> Self {
        Self { oid: oid.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.oid
    }
}

/// Video attached to a task. `url` holds the video key, not a full link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    pub url: String,
}

/// Root aggregate held by the store.
///
/// A task owns an ordered sequence of to-do items. Order is insertion order;
/// new to-dos are always appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Opaque identifier, unique within a store
    pub id: String,
    /// Task title shown on the dashboard
    pub title: String,
    /// Free-form task description
    pub description: String,
    /// Video reference
    pub video: Video,
    /// Owning user, used by the `ofuser` listing. `None` is shared by every user.
    pub owner: Option<String>,
    /// Nested to-do items in insertion order
    pub todos: Vec<Todo>,
}

impl Task {
    /// Create a task without to-dos
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        video_url: impl Into<String>,
        owner: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            video: Video {
                url: video_url.into(),
            },
            owner,
            todos: Vec::new(),
        }
    }

    /// Whether the task is listed for the given user
    ///
    /// A task without an owner is listed for everyone.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner.as_deref().map_or(true, |owner| owner == user_id)
    }

    /// Find a nested to-do by id
    pub fn todo(&self, todo_id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == todo_id)
    }

    /// Find a nested to-do by id for mutation
    pub fn todo_mut(&mut self, todo_id: &str) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|t| t.id == todo_id)
    }

    /// Take an immutable deep copy in the backend's wire shape
    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot::from(self)
    }
}

/// Leaf record nested under exactly one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    /// Opaque identifier, never reused within a store
    pub id: String,
    /// Free-form text; never empty once persisted
    pub description: String,
    /// Completion flag
    pub done: bool,
}

impl Todo {
    /// Create a new, not-yet-done to-do
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            done: false,
        }
    }

    /// Flip the completion flag and return the new value
    pub fn toggle(&mut self) -> bool {
        self.done = !self.done;
        self.done
    }
}

/// Point-in-time copy of a task, serialized exactly as the real backend does.
///
/// ```json
/// {
///   "_id": { "$oid": "stub_task_1" },
///   "title": "GUI-test task",
///   "description": "Task created by Cypress (stub)",
///   "video": { "url": "dQw4w9WgXcQ" },
///   "todos": [
///     { "_id": { "$oid": "stub_todo_1" }, "description": "initial todo", "done": false }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskSnapshot {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub video: Video,
    pub todos: Vec<TodoSnapshot>,
}

impl TaskSnapshot {
    /// Raw task id without the `$oid` wrapping
    pub fn task_id(&self) -> &str {
        self.id.as_str()
    }

    /// Descriptions of all to-dos in display order
    pub fn todo_descriptions(&self) -> Vec<&str> {
        self.todos.iter().map(|t| t.description.as_str()).collect()
    }

    /// Find a to-do by raw id
    pub fn todo(&self, todo_id: &str) -> Option<&TodoSnapshot> {
        self.todos.iter().find(|t| t.id.as_str() == todo_id)
    }
}

impl From<&Task> for TaskSnapshot {
    fn from(task: &Task) -> Self {
        Self {
            id: ObjectId::new(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone(),
            video: task.video.clone(),
            todos: task.todos.iter().map(TodoSnapshot::from).collect(),
        }
    }
}

/// Point-in-time copy of a to-do in wire shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoSnapshot {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub description: String,
    pub done: bool,
}

impl From<&Todo> for TodoSnapshot {
    fn from(todo: &Todo) -> Self {
        Self {
            id: ObjectId::new(todo.id.clone()),
            description: todo.description.clone(),
            done: todo.done,
        }
    }
}
