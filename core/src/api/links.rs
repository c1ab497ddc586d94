//! Links between entities (lead to contact, contact to company, catalog
//! elements attached to a lead, ...).

use serde::Serialize;
use serde_json::Value;

use super::{EntityType, V4};
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::Filter;
use crate::transport::Transport;

impl<T: Transport> AmoClient<T> {
    pub fn get_links(&self, entity: EntityType, entity_id: u64, filter: &Filter) -> Result<Value> {
        self.get_query(&format!("{V4}/{entity}/{entity_id}/links"), &filter.to_query())
    }

    /// `links` is the vendor's array of `{to_entity_id, to_entity_type, metadata}`.
    pub fn link_entities<B: Serialize + ?Sized>(
        &self,
        entity: EntityType,
        entity_id: u64,
        links: &B,
    ) -> Result<Value> {
        self.post(&format!("{V4}/{entity}/{entity_id}/link"), links)
    }

    pub fn unlink_entities<B: Serialize + ?Sized>(
        &self,
        entity: EntityType,
        entity_id: u64,
        links: &B,
    ) -> Result<Value> {
        self.post(&format!("{V4}/{entity}/{entity_id}/unlink"), links)
    }
}
