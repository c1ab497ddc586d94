//! Incoming leads waiting in the "unsorted" stage.

use serde::Serialize;
use serde_json::{json, Value};

use super::V4;
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::{Filter, ListParams};
use crate::transport::Transport;

/// Source channel of an unsorted lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsortedCategory {
    Sip,
    Forms,
}

impl UnsortedCategory {
    fn as_str(self) -> &'static str {
        match self {
            UnsortedCategory::Sip => "sip",
            UnsortedCategory::Forms => "forms",
        }
    }
}

/// One unsorted entry to create. `lead`, `contact` and `company` are sent
/// under `_embedded` as single-element arrays.
#[derive(Debug, Clone)]
pub struct NewUnsorted {
    pub source_uid: String,
    pub source_name: String,
    pub metadata: Value,
    pub lead: Value,
    pub contact: Value,
    pub company: Option<Value>,
    pub pipeline_id: Option<u64>,
    pub created_at: Option<i64>,
    pub request_id: Option<String>,
}

#[derive(Serialize)]
struct UnsortedBody<'a> {
    source_uid: &'a str,
    source_name: &'a str,
    metadata: &'a Value,
    _embedded: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pipeline_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<&'a str>,
}

impl NewUnsorted {
    fn body(&self) -> UnsortedBody<'_> {
        let mut embedded = json!({
            "leads": [self.lead],
            "contacts": [self.contact],
        });
        if let Some(company) = &self.company {
            embedded["companies"] = json!([company]);
        }
        UnsortedBody {
            source_uid: &self.source_uid,
            source_name: &self.source_name,
            metadata: &self.metadata,
            _embedded: embedded,
            pipeline_id: self.pipeline_id,
            created_at: self.created_at,
            request_id: self.request_id.as_deref(),
        }
    }
}

impl<T: Transport> AmoClient<T> {
    pub fn get_unsorted_leads(&self, params: &ListParams) -> Result<Value> {
        self.get_query(&format!("{V4}/leads/unsorted"), &params.to_query())
    }

    pub fn get_unsorted_by_uid(&self, uid: &str) -> Result<Value> {
        self.get(&format!("{V4}/leads/unsorted/{uid}"))
    }

    pub fn create_unsorted(
        &self,
        category: UnsortedCategory,
        entry: &NewUnsorted,
    ) -> Result<Value> {
        let path = format!("{V4}/leads/unsorted/{}", category.as_str());
        self.post(&path, &[entry.body()])
    }

    pub fn accept_unsorted(&self, uid: &str, user_id: u64, status_id: u64) -> Result<Value> {
        let body = json!({ "user_id": user_id, "status_id": status_id });
        self.post(&format!("{V4}/leads/unsorted/{uid}/accept"), &body)
    }

    pub fn decline_unsorted(&self, uid: &str, user_id: u64) -> Result<Value> {
        let body = json!({ "user_id": user_id });
        self.delete_with(&format!("{V4}/leads/unsorted/{uid}/decline"), &body)
    }

    /// Attach an unsorted chat or call to an existing entity; `link` is the
    /// vendor's `link` object (`entity_id`, `entity_type`, ...).
    pub fn link_unsorted(&self, uid: &str, user_id: u64, link: &Value) -> Result<Value> {
        let body = json!({ "user_id": user_id, "link": link });
        self.post(&format!("{V4}/leads/unsorted/{uid}/link"), &body)
    }

    pub fn get_unsorted_summary(&self, filter: &Filter) -> Result<Value> {
        self.get_query(&format!("{V4}/leads/unsorted/summary"), &filter.to_query())
    }
}
