use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BlockStorageClient, ListOptions};
use crate::error::ensure_not_empty;
use crate::types::{string_enum, CreatedId};
use crate::{
    collect_pages, ApiRequest, IdOrName, Meta, QueryParams, ResourceError, Result,
    DEFAULT_PAGE_LIMIT,
};

/// Expands the volume type details in volume responses.
pub const EXPAND_VOLUME_TYPE: &str = "volume_type";
/// Expands the attachment details in volume responses.
pub const EXPAND_ATTACHMENT: &str = "attachment";

string_enum! {
    /// Lifecycle stage of a volume.
    pub enum VolumeState {
        New => "new",
        Available => "available",
        InUse => "in-use",
        Deleted => "deleted",
        Legacy => "legacy",
    }
}

string_enum! {
    /// Detailed condition of a volume.
    pub enum VolumeStatus {
        Provisioning => "provisioning",
        Creating => "creating",
        Available => "available",
        Attaching => "attaching",
        InUse => "in-use",
        Detaching => "detaching",
        Deleting => "deleting",
        Error => "error",
        Legacy => "legacy",
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Iops {
    #[serde(default)]
    pub read: u64,
    #[serde(default)]
    pub write: u64,
    #[serde(default)]
    pub total: u64,
}

/// Volume type as embedded in a volume. Only `id` is always present;
/// the rest is filled in when `volume_type` is expanded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeTypeRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iops: Option<Iops>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentInstance {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeAttachment {
    pub instance: AttachmentInstance,
    #[serde(default)]
    pub attached_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

/// A persistent block device that can be attached to an instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Size in GiB.
    #[serde(default)]
    pub size: u64,
    pub status: VolumeStatus,
    pub state: VolumeState,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "type", default)]
    pub volume_type: VolumeTypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResourceError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<VolumeAttachment>,
    #[serde(default)]
    pub availability_zone: String,
    #[serde(default)]
    pub availability_zones: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListVolumesResponse {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub volumes: Vec<Volume>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateVolumeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    pub name: String,
    /// Size in GiB.
    pub size: u64,
    #[serde(rename = "type")]
    pub volume_type: IdOrName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<IdOrName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendVolumeRequest {
    /// New size in GiB. Must be larger than the current size.
    pub size: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetypeVolumeRequest {
    pub new_type: IdOrName,
}

#[derive(Serialize)]
struct RenameRequest<'a> {
    name: &'a str,
}

/// Volume operations under `/v1/volumes`.
pub struct VolumeService<'a> {
    client: &'a BlockStorageClient,
}

impl<'a> VolumeService<'a> {
    pub(crate) fn new(client: &'a BlockStorageClient) -> Self {
        Self { client }
    }

    /// Lists one page of volumes. `expand` values are sent as repeated
    /// `expand` parameters.
    pub async fn list(&self, opts: &ListOptions) -> Result<ListVolumesResponse> {
        let mut query = QueryParams::new();
        query
            .paging(opts.limit, opts.offset, opts.sort.as_deref())
            .push_each("expand", &opts.expand);

        self.client
            .send(ApiRequest::get("/v1/volumes").query(query))
            .await
    }

    /// Lists every volume, walking pages of [`DEFAULT_PAGE_LIMIT`].
    pub async fn list_all(&self, expand: &[&str]) -> Result<Vec<Volume>> {
        let expand: Vec<String> = expand.iter().map(|value| (*value).to_owned()).collect();
        collect_pages(DEFAULT_PAGE_LIMIT, |offset, limit| {
            let opts = ListOptions {
                limit: Some(limit),
                offset: Some(offset),
                sort: None,
                expand: expand.clone(),
            };
            async move { self.list(&opts).await.map(|page| page.volumes) }
        })
        .await
    }

    /// Creates a volume and returns its id.
    pub async fn create(&self, request: &CreateVolumeRequest) -> Result<String> {
        let created: CreatedId = self
            .client
            .send(ApiRequest::post("/v1/volumes").json(request)?)
            .await?;
        Ok(created.id)
    }

    pub async fn get(&self, id: &str, expand: &[&str]) -> Result<Volume> {
        ensure_not_empty("id", id)?;
        let mut query = QueryParams::new();
        query.push_each("expand", expand);

        self.client
            .send(ApiRequest::get(format!("/v1/volumes/{id}")).query(query))
            .await
    }

    /// Deletes a volume. It must be detached first.
    pub async fn delete(&self, id: &str) -> Result<()> {
        ensure_not_empty("id", id)?;
        self.client
            .send_empty(ApiRequest::delete(format!("/v1/volumes/{id}")))
            .await
    }

    pub async fn rename(&self, id: &str, new_name: &str) -> Result<()> {
        ensure_not_empty("id", id)?;
        let request = ApiRequest::patch(format!("/v1/volumes/{id}/rename"))
            .json(&RenameRequest { name: new_name })?;
        self.client.send_empty(request).await
    }

    /// Grows a volume. The volume must be detached or its instance stopped.
    pub async fn extend(&self, id: &str, request: &ExtendVolumeRequest) -> Result<()> {
        ensure_not_empty("id", id)?;
        self.client
            .send_empty(ApiRequest::post(format!("/v1/volumes/{id}/extend")).json(request)?)
            .await
    }

    /// Changes the volume type. The volume must be detached or its instance stopped.
    pub async fn retype(&self, id: &str, request: &RetypeVolumeRequest) -> Result<()> {
        ensure_not_empty("id", id)?;
        self.client
            .send_empty(ApiRequest::post(format!("/v1/volumes/{id}/retype")).json(request)?)
            .await
    }

    pub async fn attach(&self, volume_id: &str, instance_id: &str) -> Result<()> {
        ensure_not_empty("volume_id", volume_id)?;
        ensure_not_empty("instance_id", instance_id)?;
        self.client
            .send_empty(ApiRequest::post(format!(
                "/v1/volumes/{volume_id}/attach/{instance_id}"
            )))
            .await
    }

    pub async fn detach(&self, volume_id: &str) -> Result<()> {
        ensure_not_empty("volume_id", volume_id)?;
        self.client
            .send_empty(ApiRequest::post(format!("/v1/volumes/{volume_id}/detach")))
            .await
    }
}
