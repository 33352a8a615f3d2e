use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BlockStorageClient, ListOptions};
use crate::error::ensure_not_empty;
use crate::types::{string_enum, CreatedId};
use crate::{collect_pages, ApiRequest, IdOrName, Meta, QueryParams, Result, DEFAULT_PAGE_LIMIT};

string_enum! {
    pub enum SchedulerState {
        Available => "available",
        Deleted => "deleted",
    }
}

/// Time of day the daily snapshot runs, e.g. `"03:00:00"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFrequency {
    pub start_time: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
    pub daily: DailyFrequency,
}

/// How often snapshots are taken and how long they are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerPolicy {
    pub retention_in_days: u32,
    pub frequency: Frequency,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSnapshotConfig {
    #[serde(rename = "type")]
    pub snapshot_type: String,
}

/// A policy that snapshots its attached volumes on a schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scheduler {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ids of the attached volumes.
    #[serde(default)]
    pub volumes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SchedulerSnapshotConfig>,
    pub state: SchedulerState,
    pub policy: SchedulerPolicy,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListSchedulersResponse {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub schedulers: Vec<Scheduler>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSchedulerRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub snapshot: SchedulerSnapshotConfig,
    pub policy: SchedulerPolicy,
}

#[derive(Serialize)]
struct VolumeReference<'a> {
    volume: &'a IdOrName,
}

/// Snapshot schedulers under `/v1/schedulers`.
pub struct SchedulerService<'a> {
    client: &'a BlockStorageClient,
}

impl<'a> SchedulerService<'a> {
    pub(crate) fn new(client: &'a BlockStorageClient) -> Self {
        Self { client }
    }

    /// Lists one page of schedulers. `expand` values are sent as repeated
    /// `expand` parameters.
    pub async fn list(&self, opts: &ListOptions) -> Result<ListSchedulersResponse> {
        let mut query = QueryParams::new();
        query
            .paging(opts.limit, opts.offset, opts.sort.as_deref())
            .push_each("expand", &opts.expand);

        self.client
            .send(ApiRequest::get("/v1/schedulers").query(query))
            .await
    }

    pub async fn list_all(&self, sort: Option<&str>, expand: &[&str]) -> Result<Vec<Scheduler>> {
        let expand: Vec<String> = expand.iter().map(|value| (*value).to_owned()).collect();
        collect_pages(DEFAULT_PAGE_LIMIT, |offset, limit| {
            let opts = ListOptions {
                limit: Some(limit),
                offset: Some(offset),
                sort: sort.map(str::to_owned),
                expand: expand.clone(),
            };
            async move { self.list(&opts).await.map(|page| page.schedulers) }
        })
        .await
    }

    /// Creates a scheduler and returns its id.
    pub async fn create(&self, request: &CreateSchedulerRequest) -> Result<String> {
        ensure_not_empty("name", &request.name)?;
        let created: CreatedId = self
            .client
            .send(ApiRequest::post("/v1/schedulers").json(request)?)
            .await?;
        Ok(created.id)
    }

    pub async fn get(&self, id: &str, expand: &[&str]) -> Result<Scheduler> {
        ensure_not_empty("id", id)?;
        let mut query = QueryParams::new();
        query.push_each("expand", expand);

        self.client
            .send(ApiRequest::get(format!("/v1/schedulers/{id}")).query(query))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        ensure_not_empty("id", id)?;
        self.client
            .send_empty(ApiRequest::delete(format!("/v1/schedulers/{id}")))
            .await
    }

    /// Puts a volume under the scheduler's policy.
    pub async fn attach_volume(&self, id: &str, volume: &IdOrName) -> Result<()> {
        self.volume_action(id, "attach", volume).await
    }

    pub async fn detach_volume(&self, id: &str, volume: &IdOrName) -> Result<()> {
        self.volume_action(id, "detach", volume).await
    }

    async fn volume_action(&self, id: &str, action: &str, volume: &IdOrName) -> Result<()> {
        ensure_not_empty("id", id)?;
        let request = ApiRequest::post(format!("/v1/schedulers/{id}/{action}"))
            .json(&VolumeReference { volume })?;
        self.client.send_empty(request).await
    }
}
