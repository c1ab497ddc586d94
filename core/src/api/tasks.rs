use serde::Serialize;
use serde_json::{json, Value};

use super::V4;
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::ListParams;
use crate::transport::Transport;

impl<T: Transport> AmoClient<T> {
    pub fn get_tasks(&self, params: &ListParams) -> Result<Value> {
        self.get_query(&format!("{V4}/tasks"), &params.to_query())
    }

    pub fn get_task(&self, task_id: u64) -> Result<Value> {
        self.get(&format!("{V4}/tasks/{task_id}"))
    }

    pub fn add_tasks<B: Serialize + ?Sized>(&self, tasks: &B) -> Result<Value> {
        self.post(&format!("{V4}/tasks"), tasks)
    }

    pub fn update_tasks<B: Serialize + ?Sized>(&self, tasks: &B) -> Result<Value> {
        self.patch(&format!("{V4}/tasks"), tasks)
    }

    /// Mark a task done (or reopen it) with a result note.
    pub fn complete_task(&self, task_id: u64, is_completed: bool, result: &str) -> Result<Value> {
        let body = json!({ "is_completed": is_completed, "result": { "text": result } });
        self.patch(&format!("{V4}/tasks/{task_id}"), &body)
    }
}
