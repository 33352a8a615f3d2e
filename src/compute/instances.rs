use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::VirtualMachineClient;
use crate::error::ensure_not_empty;
use crate::types::CreatedId;
use crate::{
    collect_pages, ApiRequest, IdOrName, QueryParams, ResourceError, Result, DEFAULT_PAGE_LIMIT,
};

pub const EXPAND_IMAGE: &str = "image";
pub const EXPAND_MACHINE_TYPE: &str = "machine-type";
pub const EXPAND_NETWORK: &str = "network";

/// Header selecting the instance API revision for list and get.
pub const API_VERSION_HEADER: &str = "x-api-version";
pub const API_VERSION: &str = "1.1";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceMachineType {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vcpus: Option<u32>,
    /// Memory in MiB.
    #[serde(default)]
    pub ram: Option<u64>,
    /// Disk in GiB.
    #[serde(default)]
    pub disk: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceImage {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddresses {
    #[serde(default)]
    pub private_ipv4: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ipv6: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub security_groups: Option<Vec<String>>,
    #[serde(default)]
    pub primary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_public_ipv4: Option<String>,
    #[serde(default)]
    pub ip_addresses: IpAddresses,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceNetwork {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc: Option<IdOrName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<NetworkInterface>>,
}

/// A virtual machine. Nested objects are only populated when expanded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub machine_type: Option<InstanceMachineType>,
    #[serde(default)]
    pub image: Option<InstanceImage>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(default)]
    pub network: Option<InstanceNetwork>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResourceError>,
}

#[derive(Deserialize)]
struct ListInstancesResponse {
    #[serde(default)]
    instances: Vec<Instance>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNetworkInterface {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_groups: Option<Vec<IdOrName>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNetwork {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associate_public_ip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<CreateNetworkInterface>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc: Option<IdOrName>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInstanceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    pub image: IdOrName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    pub machine_type: IdOrName,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<CreateNetwork>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key_name: Option<String>,
    /// Base64-encoded cloud-init payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetypeInstanceRequest {
    pub machine_type: IdOrName,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowsPassword {
    pub id: String,
    pub password: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowsPasswordResponse {
    pub instance: WindowsPassword,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicRequestInterface {
    pub interface: IdOrName,
}

/// Attaches or detaches a network interface on an instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicRequest {
    pub instance: IdOrName,
    pub network: NicRequestInterface,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitLogResponse {
    #[serde(default)]
    pub logs: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct InstanceListOptions {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sort: Option<String>,
    pub expand: Vec<String>,
    pub name: Option<String>,
}

#[derive(Serialize)]
struct RenameRequest<'a> {
    name: &'a str,
}

/// Instance operations under `/v1/instances`.
pub struct InstanceService<'a> {
    client: &'a VirtualMachineClient,
}

impl<'a> InstanceService<'a> {
    pub(crate) fn new(client: &'a VirtualMachineClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &InstanceListOptions) -> Result<Vec<Instance>> {
        let mut query = QueryParams::new();
        query
            .paging(opts.limit, opts.offset, opts.sort.as_deref())
            .set_joined("expand", &opts.expand)
            .set_opt("name", opts.name.as_deref());

        let request = ApiRequest::get("/v1/instances")
            .query(query)
            .header(API_VERSION_HEADER, API_VERSION);
        let response: ListInstancesResponse = self.client.send(request).await?;
        Ok(response.instances)
    }

    /// Lists every instance matching the `name` and `expand` of `opts`.
    /// Paging fields of `opts` are ignored.
    pub async fn list_all(&self, opts: &InstanceListOptions) -> Result<Vec<Instance>> {
        collect_pages(DEFAULT_PAGE_LIMIT, |offset, limit| {
            let page = InstanceListOptions {
                limit: Some(limit),
                offset: Some(offset),
                ..opts.clone()
            };
            async move { self.list(&page).await }
        })
        .await
    }

    /// Creates an instance and returns its id.
    pub async fn create(&self, request: &CreateInstanceRequest) -> Result<String> {
        let created: CreatedId = self
            .client
            .send(ApiRequest::post("/v1/instances").json(request)?)
            .await?;
        Ok(created.id)
    }

    pub async fn get(&self, id: &str, expand: &[&str]) -> Result<Instance> {
        ensure_not_empty("id", id)?;
        let mut query = QueryParams::new();
        query.set_joined("expand", expand);

        let request = ApiRequest::get(format!("/v1/instances/{id}"))
            .query(query)
            .header(API_VERSION_HEADER, API_VERSION);
        self.client.send(request).await
    }

    pub async fn delete(&self, id: &str, delete_public_ip: bool) -> Result<()> {
        ensure_not_empty("id", id)?;
        let mut query = QueryParams::new();
        query.set("delete_public_ip", delete_public_ip);

        self.client
            .send_empty(ApiRequest::delete(format!("/v1/instances/{id}")).query(query))
            .await
    }

    pub async fn rename(&self, id: &str, new_name: &str) -> Result<()> {
        ensure_not_empty("id", id)?;
        let request = ApiRequest::patch(format!("/v1/instances/{id}/rename"))
            .json(&RenameRequest { name: new_name })?;
        self.client.send_empty(request).await
    }

    /// Moves the instance to another machine type.
    pub async fn retype(&self, id: &str, request: &RetypeInstanceRequest) -> Result<()> {
        ensure_not_empty("id", id)?;
        self.client
            .send_empty(ApiRequest::post(format!("/v1/instances/{id}/retype")).json(request)?)
            .await
    }

    pub async fn start(&self, id: &str) -> Result<()> {
        self.action(id, "start").await
    }

    pub async fn stop(&self, id: &str) -> Result<()> {
        self.action(id, "stop").await
    }

    pub async fn suspend(&self, id: &str) -> Result<()> {
        self.action(id, "suspend").await
    }

    async fn action(&self, id: &str, action: &str) -> Result<()> {
        ensure_not_empty("id", id)?;
        self.client
            .send_empty(ApiRequest::post(format!("/v1/instances/{id}/{action}")))
            .await
    }

    /// Returns the initial administrator password of a Windows instance.
    pub async fn first_windows_password(&self, id: &str) -> Result<WindowsPasswordResponse> {
        ensure_not_empty("id", id)?;
        self.client
            .send(ApiRequest::get(format!(
                "/v1/instances/config/{id}/first-windows-password"
            )))
            .await
    }

    pub async fn attach_network_interface(&self, request: &NicRequest) -> Result<()> {
        self.client
            .send_empty(ApiRequest::post("/v1/instances/network-interface/attach").json(request)?)
            .await
    }

    pub async fn detach_network_interface(&self, request: &NicRequest) -> Result<()> {
        self.client
            .send_empty(ApiRequest::post("/v1/instances/network-interface/detach").json(request)?)
            .await
    }

    /// Fetches the cloud-init log, optionally capped to the last `max_lines`.
    pub async fn init_logs(&self, id: &str, max_lines: Option<u32>) -> Result<InitLogResponse> {
        ensure_not_empty("id", id)?;
        let mut query = QueryParams::new();
        query.set_opt("max-lines-count", max_lines);

        self.client
            .send(ApiRequest::get(format!("/v1/instances/{id}/init-logs")).query(query))
            .await
    }
}
