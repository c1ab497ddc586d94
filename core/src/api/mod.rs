//! Endpoint methods of the current (v4) API.
//!
//! Each submodule adds an `impl<T: Transport> AmoClient<T>` block for one
//! resource group. Methods only assemble paths, query strings and bodies;
//! dispatch, envelopes and token refresh are handled by `AmoClient::send`.
//! Payloads are passed through as JSON: any `Serialize` value is accepted
//! for request bodies and responses come back as `serde_json::Value`.

mod account;
mod catalogs;
mod companies;
mod contacts;
mod custom_fields;
mod events;
mod leads;
mod links;
mod notes;
mod pipelines;
mod tags;
mod tasks;
mod unsorted;
mod users;
mod webhooks;
mod widgets;

pub use account::AccountWith;
pub use pipelines::{NewPipeline, PipelineUpdate, StatusUpdate};
pub use unsorted::{NewUnsorted, UnsortedCategory};
pub use users::UserWith;

use std::fmt;

pub(crate) const V4: &str = "/api/v4";

/// Resource categories that share the generic sub-resources: custom fields,
/// links, tags and notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Leads,
    Contacts,
    Companies,
    Customers,
    CustomerSegments,
    Catalog(u64),
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Leads => f.write_str("leads"),
            EntityType::Contacts => f.write_str("contacts"),
            EntityType::Companies => f.write_str("companies"),
            EntityType::Customers => f.write_str("customers"),
            EntityType::CustomerSegments => f.write_str("customers/segments"),
            EntityType::Catalog(id) => write!(f, "catalogs/{id}"),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::auth::Auth;
    use crate::client::AmoClient;
    use crate::config::ClientConfig;
    use crate::testing::ScriptedTransport;

    pub(crate) const BASE: &str = "https://example.amocrm.ru";

    pub(crate) fn client(transport: &ScriptedTransport) -> AmoClient<&ScriptedTransport> {
        AmoClient::with_transport(
            ClientConfig::new(BASE),
            Auth::LongLivedToken("token".to_string()),
            transport,
        )
        .unwrap()
    }

    pub(crate) fn url(path_and_query: &str) -> String {
        format!("{BASE}{path_and_query}")
    }
}
