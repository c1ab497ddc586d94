use serde::Serialize;
use serde_json::{json, Value};

use super::V4;
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::Query;
use crate::transport::Transport;

impl<T: Transport> AmoClient<T> {
    /// All subscriptions, or only those pointing at `destination`.
    pub fn get_webhooks(&self, destination: Option<&str>) -> Result<Value> {
        let mut query = Query::new();
        if let Some(destination) = destination {
            query.push("filter[destination]", destination);
        }
        self.get_query(&format!("{V4}/webhooks"), &query)
    }

    /// `settings` lists the events to deliver, e.g. `["add_lead", "update_contact"]`.
    pub fn subscribe_webhook<S: Serialize + ?Sized>(
        &self,
        destination: &str,
        settings: &S,
    ) -> Result<Value> {
        let body = json!({ "destination": destination, "settings": settings });
        self.post(&format!("{V4}/webhooks"), &body)
    }

    pub fn unsubscribe_webhook(&self, destination: &str) -> Result<Value> {
        let body = json!({ "destination": destination });
        self.delete_with(&format!("{V4}/webhooks"), &body)
    }
}
