use serde_json::Value;

use super::V4;
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::{with_query, Query};
use crate::transport::Transport;

/// Optional expansions of the users endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserWith {
    Role,
    Group,
}

impl UserWith {
    pub fn as_str(self) -> &'static str {
        match self {
            UserWith::Role => "role",
            UserWith::Group => "group",
        }
    }
}

fn relations(with: &[UserWith]) -> Vec<&'static str> {
    with.iter().map(|w| w.as_str()).collect()
}

impl<T: Transport> AmoClient<T> {
    pub fn get_users(&self, page: u32, limit: u32, with: &[UserWith]) -> Result<Value> {
        let mut query = Query::new();
        query.push("page", page).push("limit", limit);
        query.extend(&with_query(&relations(with)));
        self.get_query(&format!("{V4}/users"), &query)
    }

    pub fn get_user(&self, user_id: u64, with: &[UserWith]) -> Result<Value> {
        self.get_query(&format!("{V4}/users/{user_id}"), &with_query(&relations(with)))
    }
}
