//! Notes attached to entities. Most routes come in two shapes: scoped to one
//! entity (`/leads/{id}/notes`) or across the whole entity type
//! (`/leads/notes`).

use serde::Serialize;
use serde_json::Value;

use super::{EntityType, V4};
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::ListParams;
use crate::transport::Transport;

fn notes_path(entity: EntityType, entity_id: Option<u64>) -> String {
    match entity_id {
        Some(id) => format!("{V4}/{entity}/{id}/notes"),
        None => format!("{V4}/{entity}/notes"),
    }
}

impl<T: Transport> AmoClient<T> {
    pub fn get_notes(
        &self,
        entity: EntityType,
        entity_id: Option<u64>,
        params: &ListParams,
    ) -> Result<Value> {
        self.get_query(&notes_path(entity, entity_id), &params.to_query())
    }

    pub fn get_note(
        &self,
        entity: EntityType,
        note_id: u64,
        entity_id: Option<u64>,
    ) -> Result<Value> {
        self.get(&format!("{}/{note_id}", notes_path(entity, entity_id)))
    }

    pub fn create_notes<B: Serialize + ?Sized>(
        &self,
        entity: EntityType,
        entity_id: Option<u64>,
        notes: &B,
    ) -> Result<Value> {
        self.post(&notes_path(entity, entity_id), notes)
    }

    pub fn update_note<B: Serialize + ?Sized>(
        &self,
        entity: EntityType,
        entity_id: u64,
        note_id: u64,
        note: &B,
    ) -> Result<Value> {
        self.patch(&format!("{}/{note_id}", notes_path(entity, Some(entity_id))), note)
    }

    pub fn update_notes<B: Serialize + ?Sized>(
        &self,
        entity: EntityType,
        entity_id: Option<u64>,
        notes: &B,
    ) -> Result<Value> {
        self.patch(&notes_path(entity, entity_id), notes)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::fixtures::{client, url};
    use crate::http::HttpMethod;
    use crate::query::{Filter, SortOrder};
    use crate::testing::{reply, ScriptedTransport};

    #[test]
    fn notes_path_shapes() {
        assert_eq!(notes_path(EntityType::Leads, None), "/api/v4/leads/notes");
        assert_eq!(notes_path(EntityType::Contacts, Some(4)), "/api/v4/contacts/4/notes");
    }

    #[test]
    fn list_notes_of_one_entity() {
        let transport = ScriptedTransport::new(vec![reply(200, "{}")]);
        let params = ListParams::new()
            .filter(Filter::new().eq("note_type", "common"))
            .order("updated_at", SortOrder::Desc);
        client(&transport).get_notes(EntityType::Leads, Some(9), &params).unwrap();

        assert_eq!(
            transport.last_request().url,
            url("/api/v4/leads/9/notes?limit=250&page=1&filter%5Bnote_type%5D=common&order%5Bupdated_at%5D=desc")
        );
    }

    #[test]
    fn note_reads_and_writes() {
        let transport = ScriptedTransport::new(vec![
            reply(200, "{}"),
            reply(200, "{}"),
            reply(200, "{}"),
            reply(200, "{}"),
        ]);
        let client = client(&transport);
        let note = json!({"note_type": "common", "params": {"text": "Called back"}});

        client.get_note(EntityType::Companies, 77, None).unwrap();
        client.create_notes(EntityType::Leads, Some(9), &json!([note])).unwrap();
        client.update_note(EntityType::Leads, 9, 77, &note).unwrap();
        client.update_notes(EntityType::Leads, None, &json!([{"id": 77}])).unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].url, url("/api/v4/companies/notes/77"));
        assert_eq!(sent[1].method, HttpMethod::Post);
        assert_eq!(sent[1].url, url("/api/v4/leads/9/notes"));
        assert_eq!(sent[2].method, HttpMethod::Patch);
        assert_eq!(sent[2].url, url("/api/v4/leads/9/notes/77"));
        assert_eq!(sent[3].url, url("/api/v4/leads/notes"));
    }
}
