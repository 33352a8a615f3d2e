use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BlockStorageClient, ListOptions};
use crate::error::ensure_not_empty;
use crate::types::{string_enum, CreatedId};
use crate::{
    collect_pages, ApiRequest, IdOrName, QueryParams, ResourceError, Result, DEFAULT_PAGE_LIMIT,
};

/// Expands the volume in snapshot and scheduler responses.
pub const EXPAND_VOLUME: &str = "volume";

string_enum! {
    pub enum SnapshotState {
        New => "new",
        Available => "available",
        Deleted => "deleted",
    }
}

string_enum! {
    pub enum SnapshotStatus {
        Provisioning => "provisioning",
        Creating => "creating",
        CreatingError => "creating_error",
        CreatingErrorQuota => "creating_error_quota",
        Completed => "completed",
        Deleting => "deleting",
        Deleted => "deleted",
        DeletedError => "deleted_error",
        Replicating => "replicating",
        ReplicatingError => "replicating_error",
        Restoring => "restoring",
        RestoringError => "restoring_error",
        Reserved => "reserved",
    }
}

/// A point-in-time copy of a volume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub description: Option<String>,
    pub state: SnapshotState,
    pub status: SnapshotStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<IdOrName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResourceError>,
    #[serde(default)]
    pub availability_zones: Vec<String>,
    #[serde(rename = "type", default)]
    pub snapshot_type: String,
}

#[derive(Deserialize)]
struct ListSnapshotsResponse {
    #[serde(default)]
    snapshots: Vec<Snapshot>,
}

/// Either `volume` or `source_snapshot` selects what gets copied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSnapshotRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<IdOrName>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub snapshot_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_snapshot: Option<IdOrName>,
}

#[derive(Serialize)]
struct RenameRequest<'a> {
    name: &'a str,
}

pub struct SnapshotService<'a> {
    client: &'a BlockStorageClient,
}

impl<'a> SnapshotService<'a> {
    pub(crate) fn new(client: &'a BlockStorageClient) -> Self {
        Self { client }
    }

    /// Lists one page of snapshots. `expand` is sent comma-joined.
    pub async fn list(&self, opts: &ListOptions) -> Result<Vec<Snapshot>> {
        let mut query = QueryParams::new();
        query
            .paging(opts.limit, opts.offset, opts.sort.as_deref())
            .set_joined("expand", &opts.expand);

        let response: ListSnapshotsResponse = self
            .client
            .send(ApiRequest::get("/v1/snapshots").query(query))
            .await?;
        Ok(response.snapshots)
    }

    pub async fn list_all(&self, expand: &[&str]) -> Result<Vec<Snapshot>> {
        let expand: Vec<String> = expand.iter().map(|value| (*value).to_owned()).collect();
        collect_pages(DEFAULT_PAGE_LIMIT, |offset, limit| {
            let opts = ListOptions {
                limit: Some(limit),
                offset: Some(offset),
                sort: None,
                expand: expand.clone(),
            };
            async move { self.list(&opts).await }
        })
        .await
    }

    /// Creates a snapshot and returns its id.
    pub async fn create(&self, request: &CreateSnapshotRequest) -> Result<String> {
        let created: CreatedId = self
            .client
            .send(ApiRequest::post("/v1/snapshots").json(request)?)
            .await?;
        Ok(created.id)
    }

    pub async fn get(&self, id: &str, expand: &[&str]) -> Result<Snapshot> {
        ensure_not_empty("id", id)?;
        let mut query = QueryParams::new();
        query.set_joined("expand", expand);

        self.client
            .send(ApiRequest::get(format!("/v1/snapshots/{id}")).query(query))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        ensure_not_empty("id", id)?;
        self.client
            .send_empty(ApiRequest::delete(format!("/v1/snapshots/{id}")))
            .await
    }

    pub async fn rename(&self, id: &str, new_name: &str) -> Result<()> {
        ensure_not_empty("id", id)?;
        let request = ApiRequest::patch(format!("/v1/snapshots/{id}/rename"))
            .json(&RenameRequest { name: new_name })?;
        self.client.send_empty(request).await
    }
}
