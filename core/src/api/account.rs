use serde_json::Value;

use super::V4;
use crate::client::AmoClient;
use crate::error::Result;
use crate::query::with_query;
use crate::transport::Transport;

/// Optional sections of `GET /api/v4/account`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountWith {
    AmojoId,
    AmojoRights,
    UsersGroups,
    TaskTypes,
    Version,
    EntityNames,
    DatetimeSettings,
}

impl AccountWith {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountWith::AmojoId => "amojo_id",
            AccountWith::AmojoRights => "amojo_rights",
            AccountWith::UsersGroups => "users_groups",
            AccountWith::TaskTypes => "task_types",
            AccountWith::Version => "version",
            AccountWith::EntityNames => "entity_names",
            AccountWith::DatetimeSettings => "datetime_settings",
        }
    }
}

impl<T: Transport> AmoClient<T> {
    pub fn get_account_info(&self, with: &[AccountWith]) -> Result<Value> {
        let relations: Vec<&str> = with.iter().map(|w| w.as_str()).collect();
        self.get_query(&format!("{V4}/account"), &with_query(&relations))
    }
}
