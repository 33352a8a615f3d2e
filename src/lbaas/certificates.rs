use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::{load_balancer_path, LbaasClient, ListOptions, LoadBalancerCertificate, TlsCertificate};
use crate::error::ensure_not_empty;
use crate::types::CreatedId;
use crate::{collect_pages, ApiRequest, MgcError, Result, DEFAULT_PAGE_LIMIT};

/// Replaces the certificate and key of an existing TLS certificate.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCertificateRequest {
    /// Base64-encoded PEM certificate.
    pub certificate: String,
    /// Base64-encoded PEM private key.
    pub private_key: String,
}

impl fmt::Debug for UpdateCertificateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateCertificateRequest")
            .field("certificate", &self.certificate)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// TLS certificates used by `tls` listeners.
pub struct CertificateService<'a> {
    client: &'a LbaasClient,
}

impl<'a> CertificateService<'a> {
    pub(crate) fn new(client: &'a LbaasClient) -> Self {
        Self { client }
    }

    /// Uploads a certificate and returns its id. Both PEM blobs must be
    /// base64-encoded.
    pub async fn create(&self, lb_id: &str, request: &LoadBalancerCertificate) -> Result<String> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("name", &request.name)?;
        ensure_base64("certificate", &request.certificate)?;
        ensure_base64("private_key", &request.private_key)?;

        let created: CreatedId = self
            .client
            .send(ApiRequest::post(certificates_path(lb_id)).json(request)?)
            .await?;
        Ok(created.id)
    }

    pub async fn get(&self, lb_id: &str, certificate_id: &str) -> Result<TlsCertificate> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("tls_certificate_id", certificate_id)?;
        self.client
            .send(ApiRequest::get(certificate_path(lb_id, certificate_id)))
            .await
    }

    pub async fn list(&self, lb_id: &str, opts: &ListOptions) -> Result<Vec<TlsCertificate>> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        self.client.list(certificates_path(lb_id), opts).await
    }

    pub async fn list_all(&self, lb_id: &str) -> Result<Vec<TlsCertificate>> {
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
        certificate_id: &str,
        request: &UpdateCertificateRequest,
    ) -> Result<()> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("tls_certificate_id", certificate_id)?;
        ensure_base64("certificate", &request.certificate)?;
        ensure_base64("private_key", &request.private_key)?;
        self.client
            .send_empty(ApiRequest::put(certificate_path(lb_id, certificate_id)).json(request)?)
            .await
    }

    pub async fn delete(&self, lb_id: &str, certificate_id: &str) -> Result<()> {
        ensure_not_empty("load_balancer_id", lb_id)?;
        ensure_not_empty("tls_certificate_id", certificate_id)?;
        self.client
            .send_empty(ApiRequest::delete(certificate_path(lb_id, certificate_id)))
            .await
    }
}

fn ensure_base64(field: &str, value: &str) -> Result<()> {
    ensure_not_empty(field, value)?;
    STANDARD
        .decode(value.trim())
        .map(|_| ())
        .map_err(|_| MgcError::Validation {
            field: field.to_owned(),
            message: "is not base64 encoded".to_owned(),
        })
}

fn certificates_path(lb_id: &str) -> String {
    format!("{}/tls-certificates", load_balancer_path(lb_id))
}

fn certificate_path(lb_id: &str, certificate_id: &str) -> String {
    format!("{}/{certificate_id}", certificates_path(lb_id))
}
