use serde::Serialize;
use serde_json::Value;

use super::V4;
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::ListParams;
use crate::transport::Transport;

impl<T: Transport> AmoClient<T> {
    pub fn get_leads(&self, params: &ListParams) -> Result<Value> {
        self.get_query(&format!("{V4}/leads"), &params.to_query())
    }

    pub fn get_lead(&self, lead_id: u64) -> Result<Value> {
        self.get(&format!("{V4}/leads/{lead_id}"))
    }

    pub fn create_leads<B: Serialize + ?Sized>(&self, leads: &B) -> Result<Value> {
        self.post(&format!("{V4}/leads"), leads)
    }

    pub fn update_leads<B: Serialize + ?Sized>(&self, leads: &B) -> Result<Value> {
        self.patch(&format!("{V4}/leads"), leads)
    }
}
