//! Lead pipelines and their statuses.

use serde::Serialize;
use serde_json::{json, Value};

use super::V4;
use crate::client::AmoClient;
use crate::error::Result;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct NewPipeline {
    pub name: String,
    pub sort: i64,
    pub is_main: bool,
    pub is_unsorted_on: bool,
    pub statuses: Vec<Value>,
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineUpdate {
    pub name: String,
    pub sort: i64,
    pub is_main: bool,
    pub is_unsorted_on: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub name: String,
    pub sort: i64,
    pub color: String,
}

impl NewPipeline {
    fn body(&self) -> Value {
        let mut body = json!({
            "name": self.name,
            "sort": self.sort,
            "is_main": self.is_main,
            "is_unsorted_on": self.is_unsorted_on,
            "_embedded": { "statuses": self.statuses },
        });
        if let Some(request_id) = &self.request_id {
            body["request_id"] = json!(request_id);
        }
        body
    }
}

fn pipelines() -> String {
    format!("{V4}/leads/pipelines")
}

impl<T: Transport> AmoClient<T> {
    pub fn get_pipelines(&self) -> Result<Value> {
        self.get(&pipelines())
    }

    pub fn get_pipeline(&self, pipeline_id: u64) -> Result<Value> {
        self.get(&format!("{}/{pipeline_id}", pipelines()))
    }

    pub fn create_pipeline(&self, pipeline: &NewPipeline) -> Result<Value> {
        self.post(&pipelines(), &[pipeline.body()])
    }

    pub fn edit_pipeline(&self, pipeline_id: u64, update: &PipelineUpdate) -> Result<Value> {
        self.patch(&format!("{}/{pipeline_id}", pipelines()), update)
    }

    pub fn delete_pipeline(&self, pipeline_id: u64) -> Result<Value> {
        self.delete(&format!("{}/{pipeline_id}", pipelines()))
    }

    pub fn get_pipeline_statuses(&self, pipeline_id: u64) -> Result<Value> {
        self.get(&format!("{}/{pipeline_id}/statuses", pipelines()))
    }

    pub fn get_pipeline_status(&self, pipeline_id: u64, status_id: u64) -> Result<Value> {
        self.get(&format!("{}/{pipeline_id}/statuses/{status_id}", pipelines()))
    }

    pub fn add_statuses_to_pipeline<B: Serialize + ?Sized>(
        &self,
        pipeline_id: u64,
        statuses: &B,
    ) -> Result<Value> {
        self.post(&format!("{}/{pipeline_id}/statuses", pipelines()), statuses)
    }

    pub fn edit_pipeline_status(
        &self,
        pipeline_id: u64,
        status_id: u64,
        update: &StatusUpdate,
    ) -> Result<Value> {
        self.patch(&format!("{}/{pipeline_id}/statuses/{status_id}", pipelines()), update)
    }

    pub fn delete_pipeline_status(&self, pipeline_id: u64, status_id: u64) -> Result<Value> {
        self.delete(&format!("{}/{pipeline_id}/statuses/{status_id}", pipelines()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures::{client, url};
    use crate::http::HttpMethod;
    use crate::testing::{reply, ScriptedTransport};

    #[test]
    fn create_pipeline_embeds_statuses() {
        let transport = ScriptedTransport::new(vec![reply(200, "{}")]);
        let pipeline = NewPipeline {
            name: "Wholesale".to_string(),
            sort: 20,
            is_main: false,
            is_unsorted_on: true,
            statuses: vec![json!({"name": "New", "sort": 10, "color": "#fffeb2"})],
            request_id: None,
        };
        client(&transport).create_pipeline(&pipeline).unwrap();

        let sent = transport.last_request();
        assert_eq!(sent.url, url("/api/v4/leads/pipelines"));
        let body: Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body[0]["_embedded"]["statuses"][0]["name"], "New");
        assert_eq!(body[0]["is_unsorted_on"], true);
        assert!(body[0].get("request_id").is_none());
    }

    #[test]
    fn status_routes() {
        let transport = ScriptedTransport::new(vec![reply(200, "{}"), reply(204, "")]);
        let client = client(&transport);
        let update = StatusUpdate {
            name: "Qualified".to_string(),
            sort: 30,
            color: "#99ccff".to_string(),
        };
        client.edit_pipeline_status(1, 142, &update).unwrap();
        client.delete_pipeline_status(1, 142).unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Patch);
        assert_eq!(sent[0].url, url("/api/v4/leads/pipelines/1/statuses/142"));
        assert_eq!(sent[1].method, HttpMethod::Delete);
        assert!(sent[1].body.is_none());
    }
}
