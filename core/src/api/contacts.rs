use serde::Serialize;
use serde_json::Value;

use super::V4;
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::ListParams;
use crate::transport::Transport;

impl<T: Transport> AmoClient<T> {
    pub fn get_contacts(&self, params: &ListParams) -> Result<Value> {
        self.get_query(&format!("{V4}/contacts"), &params.to_query())
    }

    pub fn get_contact(&self, contact_id: u64) -> Result<Value> {
        self.get(&format!("{V4}/contacts/{contact_id}"))
    }

    pub fn create_contacts<B: Serialize + ?Sized>(&self, contacts: &B) -> Result<Value> {
        self.post(&format!("{V4}/contacts"), contacts)
    }

    pub fn update_contacts<B: Serialize + ?Sized>(&self, contacts: &B) -> Result<Value> {
        self.patch(&format!("{V4}/contacts"), contacts)
    }
}
