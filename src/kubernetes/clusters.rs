use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    cluster_path, CreateNodePoolRequest, KubernetesClient, ListOptions, MessageState, NodePool,
};
use crate::error::ensure_not_empty;
use crate::types::string_enum;
use crate::{collect_pages, ApiRequest, QueryParams, Result, DEFAULT_PAGE_LIMIT};

string_enum! {
    /// Where a cluster's node flavors come from.
    pub enum MachineTypesSource {
        External => "external",
        Internal => "internal",
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubeApiServer {
    #[serde(default)]
    pub disable_api_server_fip: Option<bool>,
    #[serde(default)]
    pub fixed_ip: Option<String>,
    #[serde(default)]
    pub floating_ip: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterNetwork {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub cidr: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subnet_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonsConfig {
    #[serde(default)]
    pub loadbalance: String,
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub secrets: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    #[serde(default)]
    pub version: String,
}

/// Cluster as it appears in list responses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub kube_api_server: Option<KubeApiServer>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub status: Option<MessageState>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub machine_types_source: Option<MachineTypesSource>,
    #[serde(default)]
    pub cluster_ipv4_cidr: Option<String>,
    #[serde(default)]
    pub services_ipv4_cidr: Option<String>,
    #[serde(default)]
    pub platform: Option<Platform>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<MessageState>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub network: Option<ClusterNetwork>,
    #[serde(default)]
    pub controlplane: Option<NodePool>,
    #[serde(default)]
    pub kube_api_server: Option<KubeApiServer>,
    #[serde(default)]
    pub node_pools: Vec<NodePool>,
    #[serde(default)]
    pub addons: Option<AddonsConfig>,
    #[serde(default)]
    pub allowed_cidrs: Vec<String>,
    #[serde(default)]
    pub services_ipv4_cidr: Option<String>,
    #[serde(default)]
    pub cluster_ipv4_cidr: Option<String>,
    #[serde(default)]
    pub machine_types_source: Option<MachineTypesSource>,
    #[serde(default)]
    pub platform: Option<Platform>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_server_group: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub node_pools: Vec<CreateNodePoolRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_cidrs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services_ipv4_cidr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_ipv4_cidr: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClusterResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: MessageState,
    #[serde(default)]
    pub allowed_cidrs: Vec<String>,
    #[serde(default)]
    pub cluster_ipv4_cidr: Option<String>,
    #[serde(default)]
    pub services_ipv4_cidr: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchClusterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_cidrs: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchClusterResponse {
    #[serde(default)]
    pub allowed_cidrs: Vec<String>,
}

/// A kubeconfig document, as consumed by `kubectl`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubeConfig {
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub clusters: Vec<KubeConfigClusterEntry>,
    #[serde(default)]
    pub contexts: Vec<KubeConfigContextEntry>,
    #[serde(rename = "current-context", default)]
    pub current_context: String,
    #[serde(default)]
    pub users: Vec<KubeConfigUserEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubeConfigClusterEntry {
    pub name: String,
    pub cluster: KubeConfigCluster,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubeConfigCluster {
    #[serde(rename = "certificate-authority-data", default)]
    pub certificate_authority_data: String,
    pub server: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubeConfigContextEntry {
    pub name: String,
    pub context: KubeConfigContext,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubeConfigContext {
    pub cluster: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub user: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubeConfigUserEntry {
    pub name: String,
    pub user: KubeConfigUser,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubeConfigUser {
    #[serde(rename = "client-certificate-data", default)]
    pub client_certificate_data: String,
    #[serde(rename = "client-key-data", default)]
    pub client_key_data: String,
}

impl std::fmt::Debug for KubeConfigUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeConfigUser")
            .field("client_certificate_data", &self.client_certificate_data)
            .field("client_key_data", &"<redacted>")
            .finish()
    }
}

pub struct ClusterService<'a> {
    client: &'a KubernetesClient,
}

impl<'a> ClusterService<'a> {
    pub(crate) fn new(client: &'a KubernetesClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<Vec<ClusterSummary>> {
        let mut query = QueryParams::new();
        query
            .paging(opts.limit, opts.offset, opts.sort.as_deref())
            .set_joined("expand", &opts.expand);

        self.client
            .send_results(ApiRequest::get("/v0/clusters").query(query))
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<ClusterSummary>> {
        collect_pages(DEFAULT_PAGE_LIMIT, |offset, limit| {
            let opts = ListOptions {
                limit: Some(limit),
                offset: Some(offset),
                ..Default::default()
            };
            async move { self.list(&opts).await }
        })
        .await
    }

    /// Starts provisioning a cluster. The returned status is usually `new`.
    pub async fn create(&self, request: &ClusterRequest) -> Result<CreateClusterResponse> {
        ensure_not_empty("name", &request.name)?;
        self.client
            .send(ApiRequest::post("/v0/clusters").json(request)?)
            .await
    }

    pub async fn get(&self, cluster_id: &str) -> Result<Cluster> {
        ensure_not_empty("clusterID", cluster_id)?;
        self.client
            .send(ApiRequest::get(cluster_path(cluster_id)))
            .await
    }

    pub async fn delete(&self, cluster_id: &str) -> Result<()> {
        ensure_not_empty("clusterID", cluster_id)?;
        self.client
            .send_empty(ApiRequest::delete(cluster_path(cluster_id)))
            .await
    }

    pub async fn update(
        &self,
        cluster_id: &str,
        request: &PatchClusterRequest,
    ) -> Result<PatchClusterResponse> {
        ensure_not_empty("clusterID", cluster_id)?;
        self.client
            .send(ApiRequest::patch(cluster_path(cluster_id)).json(request)?)
            .await
    }

    /// Fetches the cluster's kubeconfig. The API answers in YAML.
    pub async fn kubeconfig(&self, cluster_id: &str) -> Result<KubeConfig> {
        ensure_not_empty("clusterID", cluster_id)?;
        self.client
            .send(ApiRequest::get(format!("{}/kubeconfig", cluster_path(cluster_id))))
            .await
    }
}
