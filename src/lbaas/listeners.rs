use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{load_balancer_path, LbaasClient, ListOptions, ListenerProtocol};
use crate::error::ensure_not_empty;
use crate::types::CreatedId;
use crate::{collect_pages, ApiRequest, QueryParams, Result, DEFAULT_PAGE_LIMIT};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Listener {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub protocol: ListenerProtocol,
    pub port: u16,
    #[serde(default)]
    pub backend_id: Option<String>,
    #[serde(default)]
    pub tls_certificate_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of a listener creation. The backend is passed separately to
/// [`ListenerService::create`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateListenerRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub protocol: ListenerProtocol,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_certificate_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateListenerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_certificate_id: Option<String>,
}

pub struct ListenerService<'a> {
    client: &'a LbaasClient,
}

impl<'a> ListenerService<'a> {
    pub(crate) fn new(client: &'a LbaasClient) -> Self {
        Self { client }
    }

    /// Creates a listener forwarding to `backend_id` and returns its id.
    pub async fn create(
        &self,
        lb_id: &str,
        backend_id: &str,
        request: &CreateListenerRequest,
    ) -> Result<String> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("backend_id", backend_id)?;
        let mut query = QueryParams::new();
        query.set("backend_id", backend_id);

        let created: CreatedId = self
            .client
            .send(
                ApiRequest::post(listeners_path(lb_id))
                    .query(query)
                    .json(request)?,
            )
            .await?;
        Ok(created.id)
    }

    pub async fn get(&self, lb_id: &str, listener_id: &str) -> Result<Listener> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("listener_id", listener_id)?;
        self.client
            .send(ApiRequest::get(listener_path(lb_id, listener_id)))
            .await
    }

    pub async fn list(&self, lb_id: &str, opts: &ListOptions) -> Result<Vec<Listener>> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        self.client.list(listeners_path(lb_id), opts).await
    }

    pub async fn list_all(&self, lb_id: &str) -> Result<Vec<Listener>> {
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
        listener_id: &str,
        request: &UpdateListenerRequest,
    ) -> Result<()> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("listener_id", listener_id)?;
        self.client
            .send_empty(ApiRequest::put(listener_path(lb_id, listener_id)).json(request)?)
            .await
    }

    pub async fn delete(&self, lb_id: &str, listener_id: &str) -> Result<()> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("listener_id", listener_id)?;
        self.client
            .send_empty(ApiRequest::delete(listener_path(lb_id, listener_id)))
            .await
    }
}

fn listeners_path(lb_id: &str) -> String {
    format!("{}/listeners", load_balancer_path(lb_id))
}

fn listener_path(lb_id: &str, listener_id: &str) -> String {
    format!("{}/{listener_id}", listeners_path(lb_id))
}
