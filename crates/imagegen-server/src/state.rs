//! Shared application state

use dashmap::DashMap;
use imagegen_agent::AgentExecutor;
use std::sync::Arc;

use crate::models::{AgentCard, Message, Task, TaskState, TaskStatus};

/// Tasks kept for the lifetime of the process
#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<DashMap<String, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&self, task: Task) {
        self.tasks.insert(task.id.clone(), task);
    }

    /// Put a task into the working state with `message` as its latest turn
    ///
    /// A new task is created when `task_id` is unknown; a known task keeps
    /// its context and history.
    pub fn start(&self, task_id: &str, context_id: &str, message: Message) -> Task {
        let entry = self
            .tasks
            .entry(task_id.to_string())
            .and_modify(|task| {
                task.history.push(message.clone());
                task.status = TaskStatus::new(TaskState::Working, None);
            })
            .or_insert_with(|| Task::working(task_id.to_string(), context_id.to_string(), message.clone()));
        entry.value().clone()
    }

    pub fn get(&self, task_id: &str) -> Option<Task> {
        self.tasks.get(task_id).map(|entry| entry.value().clone())
    }

    /// Move a task to a new state, appending the status message to its history
    pub fn update_status(&self, task_id: &str, state: TaskState, message: Option<Message>) -> Option<Task> {
        let mut entry = self.tasks.get_mut(task_id)?;
        if let Some(message) = &message {
            entry.history.push(message.clone());
        }
        entry.status = TaskStatus::new(state, message);
        Some(entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<dyn AgentExecutor>,
    pub tasks: InMemoryTaskStore,
    pub card: Arc<AgentCard>,
}

impl AppState {
    pub fn new(executor: Arc<dyn AgentExecutor>, card: AgentCard) -> Self {
        Self {
            executor,
            tasks: InMemoryTaskStore::new(),
            card: Arc::new(card),
        }
    }
}
