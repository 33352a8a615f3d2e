use serde::Serialize;

use super::{load_balancer_path, Acl, LbaasClient};
use crate::error::ensure_not_empty;
use crate::types::CreatedId;
use crate::{ApiRequest, MgcError, Result};

#[derive(Serialize)]
struct ReplaceAclsRequest<'a> {
    acls: &'a [Acl],
}

/// Access control rules of a load balancer. Rules have no get or list call
/// of their own; they come back inside [`super::LoadBalancer::acls`].
pub struct AclService<'a> {
    client: &'a LbaasClient,
}

impl<'a> AclService<'a> {
    pub(crate) fn new(client: &'a LbaasClient) -> Self {
        Self { client }
    }

    /// Adds one rule and returns its id. `acl.id` is ignored by the API.
    pub async fn create(&self, lb_id: &str, acl: &Acl) -> Result<String> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_rule(acl)?;
        let created: CreatedId = self
            .client
            .send(ApiRequest::post(acls_path(lb_id)).json(acl)?)
            .await?;
        Ok(created.id)
    }

    /// Replaces every rule of the load balancer with `acls`.
    pub async fn replace(&self, lb_id: &str, acls: &[Acl]) -> Result<()> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        for acl in acls {
            ensure_rule(acl)?;
        }
        self.client
            .send_empty(ApiRequest::put(acls_path(lb_id)).json(&ReplaceAclsRequest { acls })?)
            .await
    }

    pub async fn delete(&self, lb_id: &str, acl_id: &str) -> Result<()> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("acl_id", acl_id)?;
        self.client
            .send_empty(ApiRequest::delete(format!("{}/{acl_id}", acls_path(lb_id))))
            .await
    }
}

fn ensure_rule(acl: &Acl) -> Result<()> {
    ensure_not_empty("ethertype", &acl.ethertype)?;
    ensure_not_empty("protocol", &acl.protocol)?;
    ensure_not_empty("action", &acl.action)?;
    if !acl.remote_ip_prefix.contains('/') {
        return Err(MgcError::Validation {
            field: "remote_ip_prefix".to_owned(),
            message: "must be in CIDR notation".to_owned(),
        });
    }
    Ok(())
}

fn acls_path(lb_id: &str) -> String {
    format!("{}/acls", load_balancer_path(lb_id))
}
