use serde::Serialize;
use serde_json::Value;

use super::{EntityType, V4};
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::Query;
use crate::transport::Transport;

impl<T: Transport> AmoClient<T> {
    pub fn get_custom_fields(&self, entity: EntityType, page: Option<u32>) -> Result<Value> {
        let mut query = Query::new();
        if let Some(page) = page {
            query.push("page", page);
        }
        self.get_query(&format!("{V4}/{entity}/custom_fields"), &query)
    }

    pub fn get_custom_field(&self, entity: EntityType, field_id: u64) -> Result<Value> {
        self.get(&format!("{V4}/{entity}/custom_fields/{field_id}"))
    }

    pub fn create_custom_fields<B: Serialize + ?Sized>(
        &self,
        entity: EntityType,
        fields: &B,
    ) -> Result<Value> {
        self.post(&format!("{V4}/{entity}/custom_fields"), fields)
    }

    pub fn update_custom_fields<B: Serialize + ?Sized>(
        &self,
        entity: EntityType,
        fields: &B,
    ) -> Result<Value> {
        self.patch(&format!("{V4}/{entity}/custom_fields"), fields)
    }
}
