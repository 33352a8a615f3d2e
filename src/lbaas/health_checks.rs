use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{load_balancer_path, HealthCheckProtocol, LbaasClient, ListOptions};
use crate::error::ensure_not_empty;
use crate::types::CreatedId;
use crate::{collect_pages, ApiRequest, Result, DEFAULT_PAGE_LIMIT};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub protocol: HealthCheckProtocol,
    /// Probe path, HTTP checks only.
    #[serde(default)]
    pub path: Option<String>,
    pub port: u16,
    #[serde(default)]
    pub healthy_status_code: Option<u16>,
    #[serde(default)]
    pub interval_seconds: Option<u32>,
    #[serde(default)]
    pub timeout_seconds: Option<u32>,
    #[serde(default)]
    pub initial_delay_seconds: Option<u32>,
    #[serde(default)]
    pub healthy_threshold_count: Option<u32>,
    #[serde(default)]
    pub unhealthy_threshold_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Unset tuning fields take the server defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateHealthCheckRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub protocol: HealthCheckProtocol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthy_status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_delay_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthy_threshold_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unhealthy_threshold_count: Option<u32>,
}

impl CreateHealthCheckRequest {
    pub fn tcp(name: impl Into<String>, port: u16) -> Self {
        Self::new(name, HealthCheckProtocol::Tcp, None, port)
    }

    pub fn http(name: impl Into<String>, path: impl Into<String>, port: u16) -> Self {
        Self::new(name, HealthCheckProtocol::Http, Some(path.into()), port)
    }

    fn new(
        name: impl Into<String>,
        protocol: HealthCheckProtocol,
        path: Option<String>,
        port: u16,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            protocol,
            path,
            port,
            healthy_status_code: None,
            interval_seconds: None,
            timeout_seconds: None,
            initial_delay_seconds: None,
            healthy_threshold_count: None,
            unhealthy_threshold_count: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateHealthCheckRequest {
    pub protocol: HealthCheckProtocol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthy_status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_delay_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthy_threshold_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unhealthy_threshold_count: Option<u32>,
}

pub struct HealthCheckService<'a> {
    client: &'a LbaasClient,
}

impl<'a> HealthCheckService<'a> {
    pub(crate) fn new(client: &'a LbaasClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, lb_id: &str, request: &CreateHealthCheckRequest) -> Result<String> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        let created: CreatedId = self
            .client
            .send(ApiRequest::post(health_checks_path(lb_id)).json(request)?)
            .await?;
        Ok(created.id)
    }

    pub async fn get(&self, lb_id: &str, health_check_id: &str) -> Result<HealthCheck> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("health_check_id", health_check_id)?;
        self.client
            .send(ApiRequest::get(health_check_path(lb_id, health_check_id)))
            .await
    }

    pub async fn list(&self, lb_id: &str, opts: &ListOptions) -> Result<Vec<HealthCheck>> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        self.client.list(health_checks_path(lb_id), opts).await
    }

    pub async fn list_all(&self, lb_id: &str) -> Result<Vec<HealthCheck>> {
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
        health_check_id: &str,
        request: &UpdateHealthCheckRequest,
    ) -> Result<()> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("health_check_id", health_check_id)?;
        self.client
            .send_empty(
                ApiRequest::put(health_check_path(lb_id, health_check_id)).json(request)?,
            )
            .await
    }

    pub async fn delete(&self, lb_id: &str, health_check_id: &str) -> Result<()> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("health_check_id", health_check_id)?;
        self.client
            .send_empty(ApiRequest::delete(health_check_path(lb_id, health_check_id)))
            .await
    }
}

fn health_checks_path(lb_id: &str) -> String {
    format!("{}/health-checks", load_balancer_path(lb_id))
}

fn health_check_path(lb_id: &str, health_check_id: &str) -> String {
    format!("{}/{health_check_id}", health_checks_path(lb_id))
}

#[cfg(test)]
mod tests {
    use super::{CreateHealthCheckRequest, HealthCheck};
    use crate::lbaas::HealthCheckProtocol;

    #[test]
    fn http_check_carries_path() {
        let mut request = CreateHealthCheckRequest::http("web", "/health", 8080);
        request.interval_seconds = Some(15);
        let json = serde_json::to_value(&request).expect("request must serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "name": "web",
                "protocol": "http",
                "path": "/health",
                "port": 8080,
                "interval_seconds": 15
            })
        );
    }

    #[test]
    fn uppercase_protocols_are_preserved() {
        let check: HealthCheck = serde_json::from_value(serde_json::json!({
            "id": "hc-2",
            "name": "test2",
            "protocol": "TCP",
            "port": 443,
            "interval_seconds": 30,
            "timeout_seconds": 5
        }))
        .expect("health check must decode");
        assert_eq!(check.protocol, HealthCheckProtocol::Other("TCP".to_owned()));
        assert_eq!(check.healthy_status_code, None);
    }
}
