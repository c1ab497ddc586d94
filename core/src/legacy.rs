//! The v2 API, reached through [`AmoClient::v2`].
//!
//! v2 responses arrive wrapped in a `{"response": ...}` envelope, which the
//! dispatcher strips. Writes go through a single POST per entity carrying
//! `add`, `update` or `delete` arrays.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::api::UnsortedCategory;
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::{with_query, Query, SortOrder};
use crate::transport::Transport;

const V2: &str = "/api/v2";
const PIPELINES_SET: &str = "/private/api/v2/json/pipelines/set";

pub const DEFAULT_LIMIT_ROWS: u32 = 500;
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Optional sections of `GET /api/v2/account`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyAccountWith {
    CustomFields,
    Users,
    Pipelines,
    Groups,
    NoteTypes,
    TaskTypes,
}

impl LegacyAccountWith {
    pub fn as_str(self) -> &'static str {
        match self {
            LegacyAccountWith::CustomFields => "custom_fields",
            LegacyAccountWith::Users => "users",
            LegacyAccountWith::Pipelines => "pipelines",
            LegacyAccountWith::Groups => "groups",
            LegacyAccountWith::NoteTypes => "note_types",
            LegacyAccountWith::TaskTypes => "task_types",
        }
    }
}

/// Entities that accept the `{add, update}` write body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyEntity {
    Leads,
    Contacts,
    Companies,
    Customers,
    Tasks,
    Notes,
}

impl LegacyEntity {
    pub fn as_str(self) -> &'static str {
        match self {
            LegacyEntity::Leads => "leads",
            LegacyEntity::Contacts => "contacts",
            LegacyEntity::Companies => "companies",
            LegacyEntity::Customers => "customers",
            LegacyEntity::Tasks => "tasks",
            LegacyEntity::Notes => "notes",
        }
    }
}

/// What a v2 note list is attached to (`type=` parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteTarget {
    Contact,
    Lead,
    Company,
    Task,
}

impl NoteTarget {
    fn as_str(self) -> &'static str {
        match self {
            NoteTarget::Contact => "contact",
            NoteTarget::Lead => "lead",
            NoteTarget::Company => "company",
            NoteTarget::Task => "task",
        }
    }
}

/// Offset pagination and filters of the v2 list endpoints. List-valued
/// filters are sent comma-joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyQuery {
    pub limit_rows: u32,
    pub limit_offset: u32,
    params: Query,
}

impl Default for LegacyQuery {
    fn default() -> Self {
        Self {
            limit_rows: DEFAULT_LIMIT_ROWS,
            limit_offset: 0,
            params: Query::new(),
        }
    }
}

fn join<I, V>(values: I) -> String
where
    I: IntoIterator<Item = V>,
    V: ToString,
{
    values.into_iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",")
}

impl LegacyQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit_rows(mut self, limit_rows: u32) -> Self {
        self.limit_rows = limit_rows;
        self
    }

    pub fn limit_offset(mut self, limit_offset: u32) -> Self {
        self.limit_offset = limit_offset;
        self
    }

    pub fn ids<I: IntoIterator<Item = u64>>(mut self, ids: I) -> Self {
        self.params.push("id", join(ids));
        self
    }

    pub fn query(mut self, text: &str) -> Self {
        self.params.push("query", text);
        self
    }

    pub fn status<I: IntoIterator<Item = u64>>(mut self, statuses: I) -> Self {
        self.params.push("status", join(statuses));
        self
    }

    pub fn responsible_users<I: IntoIterator<Item = u64>>(mut self, users: I) -> Self {
        self.params.push("responsible_user_id", join(users));
        self
    }

    pub fn with<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.params.push("with", join(relations));
        self
    }

    pub fn element_id(mut self, element_id: u64) -> Self {
        self.params.push("element_id", element_id);
        self
    }

    pub fn customer_id(mut self, customer_id: u64) -> Self {
        self.params.push("customer_id", customer_id);
        self
    }

    pub fn task_type(mut self, task_type: &str) -> Self {
        self.params.push("type", task_type);
        self
    }

    pub fn note_type(mut self, note_type: u32) -> Self {
        self.params.push("note_type", note_type);
        self
    }

    pub fn if_modified_since(mut self, since: &str) -> Self {
        self.params.push("if-modified-since", since);
        self
    }

    fn to_query(&self, leading: &[(&str, &str)]) -> Query {
        let mut query = Query::new();
        query.push("limit_rows", self.limit_rows).push("limit_offset", self.limit_offset);
        for (key, value) in leading {
            query.push(*key, value);
        }
        query.extend(&self.params);
        query
    }
}

/// Parameters of `GET /api/v2/incoming_leads`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingLeadsQuery {
    pub page_size: u32,
    pub page: u32,
    pub order_by: SortOrder,
    pub categories: Vec<UnsortedCategory>,
    pub pipeline_id: Option<u64>,
}

impl Default for IncomingLeadsQuery {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
            order_by: SortOrder::Asc,
            categories: Vec::new(),
            pipeline_id: None,
        }
    }
}

impl IncomingLeadsQuery {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        query
            .push("page_size", self.page_size)
            .push("page", self.page)
            .push("order_by", self.order_by);
        for category in &self.categories {
            query.push("categories[]", incoming_category(*category));
        }
        if let Some(pipeline_id) = self.pipeline_id {
            query.push("pipeline_id", pipeline_id);
        }
        query
    }
}

fn incoming_category(category: UnsortedCategory) -> &'static str {
    match category {
        UnsortedCategory::Sip => "sip",
        UnsortedCategory::Forms => "form",
    }
}

/// Borrowed view of a client that speaks the v2 API.
pub struct LegacyApi<'a, T> {
    client: &'a AmoClient<T>,
}

impl<T: Transport> AmoClient<T> {
    pub fn v2(&self) -> LegacyApi<'_, T> {
        LegacyApi { client: self }
    }
}

impl<T: Transport> LegacyApi<'_, T> {
    pub fn account(&self, with: &[LegacyAccountWith]) -> Result<Value> {
        let relations: Vec<&str> = with.iter().map(|w| w.as_str()).collect();
        self.client.get_query(&format!("{V2}/account"), &with_query(&relations))
    }

    /// One write call: `add` creates, `update` modifies. Absent halves are
    /// left out of the body.
    pub fn create_or_update(
        &self,
        entity: LegacyEntity,
        add: Option<&Value>,
        update: Option<&Value>,
    ) -> Result<Value> {
        let mut body = Map::new();
        if let Some(add) = add {
            body.insert("add".to_string(), add.clone());
        }
        if let Some(update) = update {
            body.insert("update".to_string(), update.clone());
        }
        self.client.post(&format!("{V2}/{}", entity.as_str()), &body)
    }

    pub fn get_leads(&self, query: &LegacyQuery) -> Result<Value> {
        self.list("leads", query)
    }

    pub fn get_contacts(&self, query: &LegacyQuery) -> Result<Value> {
        self.list("contacts", query)
    }

    pub fn get_companies(&self, query: &LegacyQuery) -> Result<Value> {
        self.list("companies", query)
    }

    pub fn get_customers(&self, query: &LegacyQuery) -> Result<Value> {
        self.list("customers", query)
    }

    pub fn delete_customers(&self, ids: &[u64]) -> Result<Value> {
        self.client.post(&format!("{V2}/customers"), &json!({ "delete": ids }))
    }

    pub fn create_transactions<B: Serialize + ?Sized>(&self, add: &B) -> Result<Value> {
        self.client.post(&format!("{V2}/transactions"), &json!({ "add": add }))
    }

    pub fn delete_transactions(&self, ids: &[u64]) -> Result<Value> {
        self.client.post(&format!("{V2}/transactions"), &json!({ "delete": ids }))
    }

    pub fn update_transaction_comments<B: Serialize + ?Sized>(&self, update: &B) -> Result<Value> {
        self.client.post(&format!("{V2}/transactions"), &json!({ "update": update }))
    }

    pub fn get_transactions(&self, query: &LegacyQuery) -> Result<Value> {
        self.list("transactions", query)
    }

    pub fn get_customer_periods(&self) -> Result<Value> {
        self.client.get(&format!("{V2}/customers_periods"))
    }

    pub fn update_customer_periods<B: Serialize + ?Sized>(&self, update: &B) -> Result<Value> {
        self.client.post(&format!("{V2}/customers_periods"), &json!({ "update": update }))
    }

    pub fn get_tasks(&self, query: &LegacyQuery) -> Result<Value> {
        self.list("tasks", query)
    }

    pub fn get_notes(&self, target: NoteTarget, query: &LegacyQuery) -> Result<Value> {
        let query = query.to_query(&[("type", target.as_str())]);
        self.client.get_query(&format!("{V2}/notes"), &query)
    }

    pub fn create_incoming_leads<B: Serialize + ?Sized>(
        &self,
        category: UnsortedCategory,
        add: &B,
    ) -> Result<Value> {
        let path = format!("{V2}/incoming_leads/{}", incoming_category(category));
        self.client.post(&path, &json!({ "add": add }))
    }

    pub fn accept_incoming_leads(
        &self,
        uids: &[&str],
        user_id: u64,
        status_id: u64,
    ) -> Result<Value> {
        let body = json!({ "accept": uids, "user_id": user_id, "status_id": status_id });
        self.client.post(&format!("{V2}/incoming_leads/accept"), &body)
    }

    pub fn decline_incoming_leads(&self, uids: &[&str], user_id: u64) -> Result<Value> {
        let body = json!({ "decline": uids, "user_id": user_id });
        self.client.post(&format!("{V2}/incoming_leads/decline"), &body)
    }

    pub fn get_incoming_leads(&self, query: &IncomingLeadsQuery) -> Result<Value> {
        self.client.get_query(&format!("{V2}/incoming_leads"), &query.to_query())
    }

    pub fn get_incoming_leads_summary(&self, date_from: &str, date_to: &str) -> Result<Value> {
        let mut query = Query::new();
        query
            .push("data[filter][date][from]", date_from)
            .push("data[filter][date][to]", date_to);
        self.client.get_query(&format!("{V2}/incoming_leads/summary"), &query)
    }

    pub fn create_custom_fields<B: Serialize + ?Sized>(&self, add: &B) -> Result<Value> {
        self.client.post(&format!("{V2}/fields"), &json!({ "add": add }))
    }

    /// `fields` are `{id, origin}` objects.
    pub fn delete_custom_fields<B: Serialize + ?Sized>(&self, fields: &B) -> Result<Value> {
        self.client.post(&format!("{V2}/fields"), &json!({ "delete": fields }))
    }

    pub fn create_pipelines<B: Serialize + ?Sized>(&self, add: &B) -> Result<Value> {
        self.client.post(PIPELINES_SET, &json!({ "request": { "pipelines": { "add": add } } }))
    }

    pub fn update_pipelines<B: Serialize + ?Sized>(&self, update: &B) -> Result<Value> {
        self.client.post(
            PIPELINES_SET,
            &json!({ "request": { "pipelines": { "update": update } } }),
        )
    }

    pub fn delete_pipelines(&self, ids: &[u64]) -> Result<Value> {
        self.client.post(PIPELINES_SET, &json!({ "request": { "id": ids } }))
    }

    fn list(&self, entity: &str, query: &LegacyQuery) -> Result<Value> {
        self.client.get_query(&format!("{V2}/{entity}"), &query.to_query(&[]))
    }
}
