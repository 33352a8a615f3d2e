use serde::{Deserialize, Serialize};

use super::{BlockStorageClient, Iops};
use crate::types::string_enum;
use crate::{collect_pages, ApiRequest, Meta, QueryParams, Result, DEFAULT_PAGE_LIMIT};

string_enum! {
    /// Physical disk backing a volume type.
    pub enum DiskType {
        Nvme => "nvme",
        Hdd => "hdd",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeType {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub disk_type: DiskType,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub iops: Iops,
    #[serde(default)]
    pub availability_zones: Vec<String>,
    #[serde(default)]
    pub allows_encryption: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListVolumeTypesResponse {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub types: Vec<VolumeType>,
}

/// Filters for [`VolumeTypeService::list`]. Empty strings are not sent.
#[derive(Clone, Debug, Default)]
pub struct ListVolumeTypesOptions {
    pub availability_zone: Option<String>,
    pub name: Option<String>,
    pub allows_encryption: Option<bool>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sort: Option<String>,
}

pub struct VolumeTypeService<'a> {
    client: &'a BlockStorageClient,
}

impl<'a> VolumeTypeService<'a> {
    pub(crate) fn new(client: &'a BlockStorageClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ListVolumeTypesOptions) -> Result<ListVolumeTypesResponse> {
        let mut query = QueryParams::new();
        query
            .set_opt("availability-zone", non_empty(&opts.availability_zone))
            .set_opt("name", non_empty(&opts.name))
            .set_opt("allows-encryption", opts.allows_encryption)
            .paging(opts.limit, opts.offset, opts.sort.as_deref());

        self.client
            .send(ApiRequest::get("/v1/volume-types").query(query))
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<VolumeType>> {
        collect_pages(DEFAULT_PAGE_LIMIT, |offset, limit| {
            let opts = ListVolumeTypesOptions {
                limit: Some(limit),
                offset: Some(offset),
                ..Default::default()
            };
            async move { self.list(&opts).await.map(|page| page.types) }
        })
        .await
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
