use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{load_balancer_path, BackendType, BalanceAlgorithm, LbaasClient, ListOptions};
use crate::error::ensure_not_empty;
use crate::types::CreatedId;
use crate::{collect_pages, ApiRequest, MgcError, Result, DEFAULT_PAGE_LIMIT};

/// A VM network interface behind a backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceTarget {
    pub nic_id: String,
    pub port: u16,
}

/// An arbitrary address behind a backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTarget {
    pub ip_address: String,
    pub port: u16,
}

/// Targets of a backend. Must match the backend's [`BackendType`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackendTargets {
    Instances(Vec<InstanceTarget>),
    Raw(Vec<RawTarget>),
}

impl BackendTargets {
    pub fn targets_type(&self) -> BackendType {
        match self {
            Self::Instances(_) => BackendType::Instance,
            Self::Raw(_) => BackendType::Raw,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Instances(targets) => targets.is_empty(),
            Self::Raw(targets) => targets.is_empty(),
        }
    }
}

/// A target as reported by the API. Instance targets carry `nic_id`,
/// raw targets only `ip_address`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackendTarget {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub nic_id: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Backend {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub balance_algorithm: BalanceAlgorithm,
    pub targets_type: BackendType,
    #[serde(default)]
    pub health_check_id: Option<String>,
    #[serde(default)]
    pub panic_threshold: Option<f64>,
    #[serde(default)]
    pub close_connections_on_host_health_failure: Option<bool>,
    #[serde(default)]
    pub targets: Vec<BackendTarget>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Creates a backend. Inside a load balancer creation request, the health
/// check is referenced by `health_check_name`; on its own, by `health_check_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateBackendRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub balance_algorithm: BalanceAlgorithm,
    pub targets_type: BackendType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<BackendTargets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panic_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_connections_on_host_health_failure: Option<bool>,
}

impl Default for CreateBackendRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            balance_algorithm: BalanceAlgorithm::RoundRobin,
            targets_type: BackendType::Instance,
            targets: None,
            health_check_id: None,
            health_check_name: None,
            panic_threshold: None,
            close_connections_on_host_health_failure: None,
        }
    }
}

/// Fields left as `None` are not changed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateBackendRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets_type: Option<BackendType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<BackendTargets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panic_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_connections_on_host_health_failure: Option<bool>,
}

/// Adds existing resources to a backend by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateTargetsRequest {
    pub targets_id: Vec<String>,
    pub targets_type: BackendType,
}

pub struct BackendService<'a> {
    client: &'a LbaasClient,
}

impl<'a> BackendService<'a> {
    pub(crate) fn new(client: &'a LbaasClient) -> Self {
        Self { client }
    }

    /// Targets of a single backend.
    pub fn targets(&self) -> BackendTargetService<'a> {
        BackendTargetService {
            client: self.client,
        }
    }

    pub async fn create(&self, lb_id: &str, request: &CreateBackendRequest) -> Result<String> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        let created: CreatedId = self
            .client
            .send(ApiRequest::post(backends_path(lb_id)).json(request)?)
            .await?;
        Ok(created.id)
    }

    pub async fn get(&self, lb_id: &str, backend_id: &str) -> Result<Backend> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("backend_id", backend_id)?;
        self.client
            .send(ApiRequest::get(backend_path(lb_id, backend_id)))
            .await
    }

    pub async fn list(&self, lb_id: &str, opts: &ListOptions) -> Result<Vec<Backend>> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        self.client.list(backends_path(lb_id), opts).await
    }

    pub async fn list_all(&self, lb_id: &str) -> Result<Vec<Backend>> {
        collect_pages(DEFAULT_PAGE_LIMIT, |offset, limit| {
            let opts = ListOptions {
                limit: Some(limit),
                offset: Some(offset),
                sort: None,
            };
            async move { self.list(lb_id, &opts).await }
        })
        .await
    }

    pub async fn update(
        &self,
        lb_id: &str,
        backend_id: &str,
        request: &UpdateBackendRequest,
    ) -> Result<()> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("backend_id", backend_id)?;
        self.client
            .send_empty(ApiRequest::put(backend_path(lb_id, backend_id)).json(request)?)
            .await
    }

    pub async fn delete(&self, lb_id: &str, backend_id: &str) -> Result<()> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("backend_id", backend_id)?;
        self.client
            .send_empty(ApiRequest::delete(backend_path(lb_id, backend_id)))
            .await
    }
}

pub struct BackendTargetService<'a> {
    client: &'a LbaasClient,
}

impl BackendTargetService<'_> {
    pub async fn create(
        &self,
        lb_id: &str,
        backend_id: &str,
        request: &CreateTargetsRequest,
    ) -> Result<String> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("backend_id", backend_id)?;
        if request.targets_id.is_empty() {
            return Err(MgcError::empty("targets_id"));
        }
        let created: CreatedId = self
            .client
            .send(ApiRequest::post(targets_path(lb_id, backend_id)).json(request)?)
            .await?;
        Ok(created.id)
    }

    pub async fn delete(&self, lb_id: &str, backend_id: &str, target_id: &str) -> Result<()> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("backend_id", backend_id)?;
        ensure_not_empty("target_id", target_id)?;
        self.client
            .send_empty(ApiRequest::delete(format!(
                "{}/{target_id}",
                targets_path(lb_id, backend_id)
            )))
            .await
    }
}

fn targets_path(lb_id: &str, backend_id: &str) -> String {
    format!("{}/targets", backend_path(lb_id, backend_id))
}

fn backends_path(lb_id: &str) -> String {
    format!("{}/backends", load_balancer_path(lb_id))
}

fn backend_path(lb_id: &str, backend_id: &str) -> String {
    format!("{}/{backend_id}", backends_path(lb_id))
}
