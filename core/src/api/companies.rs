use serde::Serialize;
use serde_json::Value;

use super::V4;
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::ListParams;
use crate::transport::Transport;

impl<T: Transport> AmoClient<T> {
    pub fn get_companies(&self, params: &ListParams) -> Result<Value> {
        self.get_query(&format!("{V4}/companies"), &params.to_query())
    }

    pub fn get_company(&self, company_id: u64) -> Result<Value> {
        self.get(&format!("{V4}/companies/{company_id}"))
    }

    pub fn create_companies<B: Serialize + ?Sized>(&self, companies: &B) -> Result<Value> {
        self.post(&format!("{V4}/companies"), companies)
    }

    pub fn update_companies<B: Serialize + ?Sized>(&self, companies: &B) -> Result<Value> {
        self.patch(&format!("{V4}/companies"), companies)
    }
}
