use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    load_balancer_path, Backend, CreateBackendRequest, CreateHealthCheckRequest, HealthCheck,
    LbaasClient, Listener, ListenerProtocol, ListOptions, LoadBalancerStatus, Visibility,
    LOAD_BALANCERS_PATH,
};
use crate::error::ensure_not_empty;
use crate::types::CreatedId;
use crate::{collect_pages, ApiRequest, QueryParams, Result, DEFAULT_PAGE_LIMIT};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIp {
    pub id: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TlsCertificate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// PEM certificate, when the API includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `IPv4` or `IPv6`.
    pub ethertype: String,
    pub protocol: String,
    pub remote_ip_prefix: String,
    /// `ALLOW`, `DENY` or `DENY_UNSPECIFIED`.
    pub action: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub lb_type: String,
    pub visibility: Visibility,
    pub status: LoadBalancerStatus,
    #[serde(default)]
    pub listeners: Vec<Listener>,
    #[serde(default)]
    pub backends: Vec<Backend>,
    #[serde(default)]
    pub health_checks: Vec<HealthCheck>,
    /// `null` on internal load balancers.
    #[serde(default)]
    pub public_ips: Option<Vec<PublicIp>>,
    #[serde(default)]
    pub tls_certificates: Vec<TlsCertificate>,
    #[serde(default)]
    pub acls: Vec<Acl>,
    #[serde(default)]
    pub vpc_id: String,
    #[serde(default)]
    pub subnet_pool_id: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Listener declared inline when creating a load balancer. It refers to its
/// backend and certificate by name since neither has an id yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerListener {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub backend_name: String,
    pub protocol: ListenerProtocol,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_certificate_name: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerCertificate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Base64-encoded PEM certificate.
    pub certificate: String,
    /// Base64-encoded PEM private key.
    pub private_key: String,
}

impl fmt::Debug for LoadBalancerCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadBalancerCertificate")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("certificate", &self.certificate)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateLoadBalancerRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub lb_type: Option<String>,
    pub visibility: Visibility,
    pub listeners: Vec<LoadBalancerListener>,
    pub backends: Vec<CreateBackendRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub health_checks: Vec<CreateHealthCheckRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tls_certificates: Vec<LoadBalancerCertificate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acls: Vec<Acl>,
    pub vpc_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_ip_id: Option<String>,
}

impl CreateLoadBalancerRequest {
    pub fn new(name: impl Into<String>, visibility: Visibility, vpc_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            lb_type: None,
            visibility,
            listeners: Vec::new(),
            backends: Vec::new(),
            health_checks: Vec::new(),
            tls_certificates: Vec::new(),
            acls: Vec::new(),
            vpc_id: vpc_id.into(),
            subnet_pool_id: None,
            public_ip_id: None,
        }
    }
}

/// Fields left as `None` are not changed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLoadBalancerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Operations under `/v0beta1/network-load-balancers`.
pub struct LoadBalancerService<'a> {
    client: &'a LbaasClient,
}

impl<'a> LoadBalancerService<'a> {
    pub(crate) fn new(client: &'a LbaasClient) -> Self {
        Self { client }
    }

    /// Creates a load balancer and returns its id. Provisioning continues
    /// asynchronously; poll [`LoadBalancerService::get`] for the status.
    pub async fn create(&self, request: &CreateLoadBalancerRequest) -> Result<String> {
        let created: CreatedId = self
            .client
            .send(ApiRequest::post(LOAD_BALANCERS_PATH).json(request)?)
            .await?;
        Ok(created.id)
    }

    pub async fn get(&self, lb_id: &str) -> Result<LoadBalancer> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        self.client
            .send(ApiRequest::get(load_balancer_path(lb_id)))
            .await
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<Vec<LoadBalancer>> {
        self.client.list(LOAD_BALANCERS_PATH.to_owned(), opts).await
    }

    pub async fn list_all(&self) -> Result<Vec<LoadBalancer>> {
        collect_pages(DEFAULT_PAGE_LIMIT, |offset, limit| {
            let opts = ListOptions {
                limit: Some(limit),
                offset: Some(offset),
                sort: None,
            };
            async move { self.list(&opts).await }
        })
        .await
    }

    pub async fn update(&self, lb_id: &str, request: &UpdateLoadBalancerRequest) -> Result<()> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        self.client
            .send_empty(ApiRequest::put(load_balancer_path(lb_id)).json(request)?)
            .await
    }

    /// Deletes a load balancer, releasing its public IP when `delete_public_ip` is set.
    pub async fn delete(&self, lb_id: &str, delete_public_ip: bool) -> Result<()> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        let mut query = QueryParams::new();
        query.set("delete_public_ip", delete_public_ip);

        self.client
            .send_empty(ApiRequest::delete(load_balancer_path(lb_id)).query(query))
            .await
    }
}
