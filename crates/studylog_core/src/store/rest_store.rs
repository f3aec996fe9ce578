//! Hosted table store over a PostgREST-style HTTP API.
//!
//! # Responsibility
//! - Map select/insert/delete to `GET`/`POST`/`DELETE` on `/rest/v1/{table}`.
//! - Translate hosted rows (`time` column) into `Record`.
//!
//! # Invariants
//! - Every request carries `apikey` and bearer authorization headers.
//! - Mutations ask for `return=representation` so inserts yield the
//!   assigned id and deletes can detect missing rows.

use crate::config::RestConfig;
use crate::model::record::{NewRecord, Record, RecordId};
use crate::store::record_store::{RecordStore, StoreError, StoreResult};
use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_ERROR_BODY_CHARS: usize = 200;
const UNREADABLE_BODY: &str = "<unreadable body>";

/// Row shape of the hosted study record table.
#[derive(Debug, Deserialize)]
struct StudyRecordRow {
    id: RecordId,
    title: String,
    time: f64,
}

#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    title: &'a str,
    time: f64,
}

impl StudyRecordRow {
    fn into_record(self) -> StoreResult<Record> {
        let record = Record {
            id: self.id,
            title: self.title,
            hours: self.time,
        };
        record
            .validate()
            .map_err(|err| StoreError::InvalidData(format!("row {}: {err}", record.id)))?;
        Ok(record)
    }
}

/// Record store backed by a hosted table.
pub struct RestRecordStore {
    client: Client,
    table_url: String,
    api_key: String,
}

impl RestRecordStore {
    /// Builds an HTTP client for the configured table.
    ///
    /// Does not touch the network; the first call does.
    pub fn new(config: &RestConfig) -> StoreResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            table_url: table_url(&config.base_url, &config.table),
            api_key: config.api_key.clone(),
        })
    }

    fn send(&self, operation: &'static str, request: RequestBuilder) -> StoreResult<Response> {
        let response = request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()?;
        let status = response.status();
        debug!(
            "event=remote_request module=store status_code={} operation={operation}",
            status.as_u16()
        );

        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| UNREADABLE_BODY.to_string());
            return Err(StoreError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }
        Ok(response)
    }
}

impl RecordStore for RestRecordStore {
    fn select_all(&self) -> StoreResult<Vec<Record>> {
        let request = self.client.get(&self.table_url).query(&[("select", "*")]);
        let rows: Vec<StudyRecordRow> = self.send("select_all", request)?.json()?;
        rows.into_iter().map(StudyRecordRow::into_record).collect()
    }

    fn insert(&self, record: &NewRecord) -> StoreResult<Record> {
        record.validate()?;

        let body = [InsertRow {
            title: record.title.as_str(),
            time: record.hours,
        }];
        let request = self
            .client
            .post(&self.table_url)
            .header("Prefer", "return=representation")
            .json(&body);
        let rows: Vec<StudyRecordRow> = self.send("insert", request)?.json()?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::InvalidData("insert returned no row".to_string()))?
            .into_record()
    }

    fn delete_by_id(&self, id: RecordId) -> StoreResult<()> {
        let request = self
            .client
            .delete(&self.table_url)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation");
        let rows: Vec<StudyRecordRow> = self.send("delete_by_id", request)?.json()?;

        if rows.is_empty() {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "rest"
    }
}

fn table_url(base_url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base_url.trim().trim_end_matches('/'), table.trim())
}
