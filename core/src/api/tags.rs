use serde::Serialize;
use serde_json::Value;

use super::{EntityType, V4};
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::ListParams;
use crate::transport::Transport;

impl<T: Transport> AmoClient<T> {
    pub fn get_tags(&self, entity: EntityType, params: &ListParams) -> Result<Value> {
        self.get_query(&format!("{V4}/{entity}/tags"), &params.to_query())
    }

    pub fn add_tags<B: Serialize + ?Sized>(&self, entity: EntityType, tags: &B) -> Result<Value> {
        self.post(&format!("{V4}/{entity}/tags"), tags)
    }
}
