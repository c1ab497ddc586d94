use serde::Serialize;
use serde_json::Value;

use super::V4;
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::Query;
use crate::transport::Transport;

impl<T: Transport> AmoClient<T> {
    pub fn get_widgets(&self, page: u32, limit: u32) -> Result<Value> {
        let mut query = Query::new();
        query.push("page", page).push("limit", limit);
        self.get_query(&format!("{V4}/widgets"), &query)
    }

    pub fn get_widget(&self, code: &str) -> Result<Value> {
        self.get(&format!("{V4}/widgets/{code}"))
    }

    /// `settings` is the widget-specific settings object.
    pub fn install_widget<B: Serialize + ?Sized>(&self, code: &str, settings: &B) -> Result<Value> {
        self.post(&format!("{V4}/widgets/{code}"), settings)
    }

    pub fn uninstall_widget(&self, code: &str) -> Result<Value> {
        self.delete(&format!("{V4}/widgets/{code}"))
    }
}
