use serde::{Deserialize, Serialize};

use super::VirtualMachineClient;
use crate::{collect_pages, ApiRequest, QueryParams, Result, DEFAULT_PAGE_LIMIT};

/// A VM size. `ram` is in MiB and `disk` in GiB.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub vcpus: u32,
    #[serde(default)]
    pub ram: u64,
    #[serde(default)]
    pub disk: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu: Option<u32>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zones: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct MachineTypeList {
    #[serde(default)]
    machine_types: Vec<MachineType>,
}

#[derive(Clone, Debug, Default)]
pub struct MachineTypeListOptions {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sort: Option<String>,
    pub availability_zone: Option<String>,
}

pub struct MachineTypeService<'a> {
    client: &'a VirtualMachineClient,
}

impl<'a> MachineTypeService<'a> {
    pub(crate) fn new(client: &'a VirtualMachineClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &MachineTypeListOptions) -> Result<Vec<MachineType>> {
        let mut query = QueryParams::new();
        query
            .paging(opts.limit, opts.offset, opts.sort.as_deref())
            .set_opt(
                "availability-zone",
                opts.availability_zone.as_deref().filter(|zone| !zone.is_empty()),
            );

        let response: MachineTypeList = self
            .client
            .send(ApiRequest::get("/v1/machine-types").query(query))
            .await?;
        Ok(response.machine_types)
    }

    pub async fn list_all(&self, opts: &MachineTypeListOptions) -> Result<Vec<MachineType>> {
        collect_pages(DEFAULT_PAGE_LIMIT, |offset, limit| {
            let page = MachineTypeListOptions {
                limit: Some(limit),
                offset: Some(offset),
                ..opts.clone()
            };
            async move { self.list(&page).await }
        })
        .await
    }
}
