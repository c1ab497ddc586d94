//! Catalogs (product lists, invoices) and their elements.

use serde::Serialize;
use serde_json::Value;

use super::V4;
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::{ListParams, Query};
use crate::transport::Transport;

impl<T: Transport> AmoClient<T> {
    pub fn get_catalogs(&self, page: u32, limit: u32) -> Result<Value> {
        let mut query = Query::new();
        query.push("page", page).push("limit", limit);
        self.get_query(&format!("{V4}/catalogs"), &query)
    }

    pub fn get_catalog(&self, catalog_id: u64) -> Result<Value> {
        self.get(&format!("{V4}/catalogs/{catalog_id}"))
    }

    pub fn create_catalogs<B: Serialize + ?Sized>(&self, catalogs: &B) -> Result<Value> {
        self.post(&format!("{V4}/catalogs"), catalogs)
    }

    pub fn update_catalogs<B: Serialize + ?Sized>(&self, catalogs: &B) -> Result<Value> {
        self.patch(&format!("{V4}/catalogs"), catalogs)
    }

    pub fn get_catalog_elements(&self, catalog_id: u64, params: &ListParams) -> Result<Value> {
        self.get_query(&format!("{V4}/catalogs/{catalog_id}/elements"), &params.to_query())
    }

    pub fn get_catalog_element(&self, catalog_id: u64, element_id: u64) -> Result<Value> {
        self.get(&format!("{V4}/catalogs/{catalog_id}/elements/{element_id}"))
    }

    pub fn add_catalog_elements<B: Serialize + ?Sized>(
        &self,
        catalog_id: u64,
        elements: &B,
    ) -> Result<Value> {
        self.post(&format!("{V4}/catalogs/{catalog_id}/elements"), elements)
    }

    pub fn update_catalog_elements<B: Serialize + ?Sized>(
        &self,
        catalog_id: u64,
        elements: &B,
    ) -> Result<Value> {
        self.patch(&format!("{V4}/catalogs/{catalog_id}/elements"), elements)
    }
}
