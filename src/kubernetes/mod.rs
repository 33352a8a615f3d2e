//! Managed Kubernetes: clusters, node pools, flavors and versions.

mod clusters;
mod flavors;
mod node_pools;
mod versions;

pub use clusters::{
    AddonsConfig, Cluster, ClusterNetwork, ClusterRequest, ClusterService, ClusterSummary,
    CreateClusterResponse, KubeApiServer, KubeConfig, KubeConfigCluster, KubeConfigClusterEntry,
    KubeConfigContext, KubeConfigContextEntry, KubeConfigUser, KubeConfigUserEntry,
    MachineTypesSource, PatchClusterRequest, PatchClusterResponse, Platform,
};
pub use flavors::{FlavorService, FlavorsAvailable};
pub use node_pools::{
    Node, NodeAddress, NodeInfrastructure, NodePoolService, NodeResources, PatchNodePoolRequest,
};
pub use versions::{Version, VersionService};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{ApiRequest, CoreClient, Result};

pub const BASE_PATH: &str = "/kubernetes";

#[derive(Clone, Debug, Default)]
pub struct ListOptions {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sort: Option<String>,
    /// Sent comma-joined as `expand`.
    pub expand: Vec<String>,
}

/// Lifecycle state with a human-readable detail.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageState {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taint {
    pub key: String,
    pub value: String,
    /// `NoSchedule`, `PreferNoSchedule` or `NoExecute`.
    pub effect: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoScale {
    pub min_replicas: Option<u32>,
    pub max_replicas: Option<u32>,
}

/// A machine size offered for nodes or the control plane.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flavor {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub vcpu: u32,
    /// Memory in MiB.
    #[serde(default)]
    pub ram: u64,
    /// Disk in GiB.
    #[serde(default)]
    pub size: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceTemplate {
    #[serde(default)]
    pub flavor: Flavor,
    #[serde(default)]
    pub node_image: String,
    #[serde(default)]
    pub disk_size: u64,
    #[serde(default)]
    pub disk_type: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodePool {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub instance_template: InstanceTemplate,
    #[serde(default)]
    pub replicas: u32,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taints: Option<Vec<Taint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_groups: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_scale: Option<AutoScale>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub flavor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pods_per_node: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zones: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNodePoolRequest {
    pub name: String,
    pub flavor: String,
    pub replicas: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taints: Option<Vec<Taint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scale: Option<AutoScale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pods_per_node: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zones: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct Results<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

/// Entry point for the Kubernetes API.
#[derive(Clone, Debug)]
pub struct KubernetesClient {
    core: CoreClient,
}

impl KubernetesClient {
    pub fn new(core: CoreClient) -> Self {
        Self { core }
    }

    pub fn clusters(&self) -> ClusterService<'_> {
        ClusterService::new(self)
    }

    pub fn node_pools(&self) -> NodePoolService<'_> {
        NodePoolService::new(self)
    }

    pub fn flavors(&self) -> FlavorService<'_> {
        FlavorService::new(self)
    }

    pub fn versions(&self) -> VersionService<'_> {
        VersionService::new(self)
    }

    pub(crate) async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.core.send(request.prefixed(BASE_PATH)).await
    }

    pub(crate) async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.core.send_empty(request.prefixed(BASE_PATH)).await
    }

    /// Sends a request whose body is a `{"results": [...]}` envelope.
    pub(crate) async fn send_results<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Vec<T>> {
        let envelope: Results<T> = self.send(request).await?;
        Ok(envelope.results)
    }
}

fn cluster_path(cluster_id: &str) -> String {
    format!("/v0/clusters/{cluster_id}")
}
