//! Network load balancers and their sub-resources: listeners, backends and
//! their targets, health checks, TLS certificates and ACL rules.
//!
//! Sub-resources are addressed through their parent load balancer, so every
//! call below the load balancer takes its id first.

mod acls;
mod backends;
mod certificates;
mod health_checks;
mod listeners;
mod load_balancers;

pub use acls::AclService;
pub use backends::{
    Backend, BackendService, BackendTarget, BackendTargetService, BackendTargets,
    CreateBackendRequest, CreateTargetsRequest, InstanceTarget, RawTarget, UpdateBackendRequest,
};
pub use certificates::{CertificateService, UpdateCertificateRequest};
pub use health_checks::{
    CreateHealthCheckRequest, HealthCheck, HealthCheckService, UpdateHealthCheckRequest,
};
pub use listeners::{CreateListenerRequest, Listener, ListenerService, UpdateListenerRequest};
pub use load_balancers::{
    Acl, CreateLoadBalancerRequest, LoadBalancer, LoadBalancerCertificate, LoadBalancerListener,
    LoadBalancerService, PublicIp, TlsCertificate, UpdateLoadBalancerRequest,
};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::types::string_enum;
use crate::{ApiRequest, CoreClient, Result};

pub const BASE_PATH: &str = "/load-balancer";

const LOAD_BALANCERS_PATH: &str = "/v0beta1/network-load-balancers";

string_enum! {
    pub enum LoadBalancerStatus {
        Creating => "creating",
        Updating => "updating",
        Deleting => "deleting",
        Running => "running",
        Failed => "failed",
        Canceled => "canceled",
        Deleted => "deleted",
        Inactive => "inactive",
    }
}

string_enum! {
    pub enum Visibility {
        Internal => "internal",
        External => "external",
    }
}

string_enum! {
    pub enum ListenerProtocol {
        Tcp => "tcp",
        Tls => "tls",
    }
}

string_enum! {
    pub enum HealthCheckProtocol {
        Tcp => "tcp",
        Http => "http",
    }
}

string_enum! {
    pub enum BalanceAlgorithm {
        RoundRobin => "round_robin",
    }
}

string_enum! {
    /// Kind of targets a backend routes to.
    pub enum BackendType {
        Instance => "instance",
        Raw => "raw",
    }
}

/// Paging parameters shared by every list call in this module.
#[derive(Clone, Debug, Default)]
pub struct ListOptions {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sort: Option<String>,
}

/// Envelope of every list response here. The `meta` block differs between
/// resources and is not exposed.
#[derive(Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

/// Entry point for the load balancer API.
#[derive(Clone, Debug)]
pub struct LbaasClient {
    core: CoreClient,
}

impl LbaasClient {
    pub fn new(core: CoreClient) -> Self {
        Self { core }
    }

    pub fn load_balancers(&self) -> LoadBalancerService<'_> {
        LoadBalancerService::new(self)
    }

    pub fn listeners(&self) -> ListenerService<'_> {
        ListenerService::new(self)
    }

    pub fn backends(&self) -> BackendService<'_> {
        BackendService::new(self)
    }

    pub fn health_checks(&self) -> HealthCheckService<'_> {
        HealthCheckService::new(self)
    }

    pub fn certificates(&self) -> CertificateService<'_> {
        CertificateService::new(self)
    }

    pub fn acls(&self) -> AclService<'_> {
        AclService::new(self)
    }

    pub(crate) async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.core.send(request.prefixed(BASE_PATH)).await
    }

    pub(crate) async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.core.send_empty(request.prefixed(BASE_PATH)).await
    }

    pub(crate) async fn list<T: DeserializeOwned>(
        &self,
        path: String,
        opts: &ListOptions,
    ) -> Result<Vec<T>> {
        let mut query = crate::QueryParams::new();
        query.paging(opts.limit, opts.offset, opts.sort.as_deref());
        let response: ListResponse<T> = self.send(ApiRequest::get(path).query(query)).await?;
        Ok(response.results)
    }
}

fn load_balancer_path(lb_id: &str) -> String {
    format!("{LOAD_BALANCERS_PATH}/{lb_id}")
}
