use serde::{Deserialize, Serialize};

use super::VirtualMachineClient;
use crate::types::string_enum;
use crate::{collect_pages, ApiRequest, QueryParams, Result, DEFAULT_PAGE_LIMIT};

string_enum! {
    pub enum ImageStatus {
        Active => "active",
        Deprecated => "deprecated",
        Deleted => "deleted",
        Pending => "pending",
        Creating => "creating",
        Importing => "importing",
        Error => "error",
        DeletingError => "deleting_error",
    }
}

/// Smallest machine an image can boot on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumRequirements {
    #[serde(default)]
    pub vcpu: u32,
    #[serde(default)]
    pub ram: u64,
    #[serde(default)]
    pub disk: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub status: ImageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_standard_support_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_life_at: Option<String>,
    #[serde(default)]
    pub minimum_requirements: MinimumRequirements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zones: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct ImageList {
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Clone, Debug, Default)]
pub struct ImageListOptions {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sort: Option<String>,
    /// Sent comma-joined as `_labels`.
    pub labels: Vec<String>,
    pub availability_zone: Option<String>,
}

pub struct ImageService<'a> {
    client: &'a VirtualMachineClient,
}

impl<'a> ImageService<'a> {
    pub(crate) fn new(client: &'a VirtualMachineClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ImageListOptions) -> Result<Vec<Image>> {
        let mut query = QueryParams::new();
        query
            .paging(opts.limit, opts.offset, opts.sort.as_deref())
            .set_joined("_labels", &opts.labels)
            .set_opt("availability-zone", opts.availability_zone.as_deref());

        let response: ImageList = self
            .client
            .send(ApiRequest::get("/v1/images").query(query))
            .await?;
        Ok(response.images)
    }

    /// Lists every image matching the label and zone filters of `opts`.
    pub async fn list_all(&self, opts: &ImageListOptions) -> Result<Vec<Image>> {
        collect_pages(DEFAULT_PAGE_LIMIT, |offset, limit| {
            let page = ImageListOptions {
                limit: Some(limit),
                offset: Some(offset),
                ..opts.clone()
            };
            async move { self.list(&page).await }
        })
        .await
    }
}
