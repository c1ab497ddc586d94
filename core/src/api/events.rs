use serde_json::Value;

use super::V4;
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::{with_query, ListParams, Query};
use crate::transport::Transport;

impl<T: Transport> AmoClient<T> {
    /// Event type catalogue, localized when `language_code` is given.
    pub fn get_event_types(&self, language_code: Option<&str>) -> Result<Value> {
        let mut query = Query::new();
        if let Some(language_code) = language_code {
            query.push("language_code", language_code);
        }
        self.get_query(&format!("{V4}/events/types"), &query)
    }

    pub fn get_events(&self, params: &ListParams) -> Result<Value> {
        self.get_query(&format!("{V4}/events"), &params.to_query())
    }

    pub fn get_event(&self, event_id: &str, with: &[&str]) -> Result<Value> {
        self.get_query(&format!("{V4}/events/{event_id}"), &with_query(with))
    }
}
