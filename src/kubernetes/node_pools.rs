use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{
    cluster_path, AutoScale, CreateNodePoolRequest, KubernetesClient, ListOptions, MessageState,
    NodePool, Taint,
};
use crate::error::ensure_not_empty;
use crate::{collect_pages, ApiRequest, QueryParams, Result, DEFAULT_PAGE_LIMIT};

/// Fields left as `None` are not changed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchNodePoolRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scale: Option<AutoScale>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddress {
    pub address: String,
    #[serde(rename = "type")]
    pub address_type: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeResources {
    #[serde(default)]
    pub cpu: String,
    #[serde(default)]
    pub ephemeral_storage: String,
    #[serde(rename = "hugepages_1Gi", default)]
    pub hugepages_1gi: String,
    #[serde(rename = "hugepages_2Mi", default)]
    pub hugepages_2mi: String,
    #[serde(default)]
    pub memory: String,
    #[serde(default)]
    pub pods: String,
}

/// What the kubelet reports about the machine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfrastructure {
    #[serde(default)]
    pub allocatable: NodeResources,
    #[serde(default)]
    pub capacity: NodeResources,
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub container_runtime_version: String,
    #[serde(default)]
    pub kernel_version: String,
    #[serde(default)]
    pub kube_proxy_version: String,
    #[serde(default)]
    pub kubelet_version: String,
    #[serde(default)]
    pub operating_system: String,
    #[serde(default)]
    pub os_image: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default)]
    pub nodepool_name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub taints: Vec<Taint>,
    #[serde(default)]
    pub addresses: Vec<NodeAddress>,
    #[serde(default)]
    pub flavor: String,
    #[serde(default)]
    pub infrastructure: NodeInfrastructure,
    #[serde(default)]
    pub status: MessageState,
}

pub struct NodePoolService<'a> {
    client: &'a KubernetesClient,
}

impl<'a> NodePoolService<'a> {
    pub(crate) fn new(client: &'a KubernetesClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, cluster_id: &str, opts: &ListOptions) -> Result<Vec<NodePool>> {
        ensure_not_empty("clusterID", cluster_id)?;
        let mut query = QueryParams::new();
        query
            .paging(opts.limit, opts.offset, opts.sort.as_deref())
            .set_joined("expand", &opts.expand);

        self.client
            .send_results(
                ApiRequest::get(format!("/v1alpha0/clusters/{cluster_id}/node-pools"))
                    .query(query),
            )
            .await
    }

    pub async fn list_all(&self, cluster_id: &str) -> Result<Vec<NodePool>> {
        collect_pages(DEFAULT_PAGE_LIMIT, |offset, limit| {
            let opts = ListOptions {
                limit: Some(limit),
                offset: Some(offset),
                ..Default::default()
            };
            async move { self.list(cluster_id, &opts).await }
        })
        .await
    }

    pub async fn create(
        &self,
        cluster_id: &str,
        request: &CreateNodePoolRequest,
    ) -> Result<NodePool> {
        ensure_not_empty("clusterID", cluster_id)?;
        self.client
            .send(ApiRequest::post(node_pools_path(cluster_id)).json(request)?)
            .await
    }

    pub async fn get(&self, cluster_id: &str, node_pool_id: &str) -> Result<NodePool> {
        ensure_ids(cluster_id, node_pool_id)?;
        self.client
            .send(ApiRequest::get(node_pool_path(cluster_id, node_pool_id)))
            .await
    }

    /// Resizes a node pool or changes its autoscaling bounds.
    pub async fn update(
        &self,
        cluster_id: &str,
        node_pool_id: &str,
        request: &PatchNodePoolRequest,
    ) -> Result<NodePool> {
        ensure_ids(cluster_id, node_pool_id)?;
        self.client
            .send(ApiRequest::patch(node_pool_path(cluster_id, node_pool_id)).json(request)?)
            .await
    }

    pub async fn delete(&self, cluster_id: &str, node_pool_id: &str) -> Result<()> {
        ensure_ids(cluster_id, node_pool_id)?;
        self.client
            .send_empty(ApiRequest::delete(node_pool_path(cluster_id, node_pool_id)))
            .await
    }

    /// Lists the Kubernetes nodes currently backing a node pool.
    pub async fn nodes(&self, cluster_id: &str, node_pool_id: &str) -> Result<Vec<Node>> {
        ensure_ids(cluster_id, node_pool_id)?;
        self.client
            .send_results(ApiRequest::get(format!(
                "{}/nodes",
                node_pool_path(cluster_id, node_pool_id)
            )))
            .await
    }
}

fn ensure_ids(cluster_id: &str, node_pool_id: &str) -> Result<()> {
    ensure_not_empty("clusterID", cluster_id)?;
    ensure_not_empty("nodePoolID", node_pool_id)
}

fn node_pools_path(cluster_id: &str) -> String {
    format!("{}/node_pools", cluster_path(cluster_id))
}

fn node_pool_path(cluster_id: &str, node_pool_id: &str) -> String {
    format!("{}/{node_pool_id}", node_pools_path(cluster_id))
}
