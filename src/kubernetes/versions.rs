use serde::{Deserialize, Serialize};

use super::KubernetesClient;
use crate::{ApiRequest, Result};

/// A Kubernetes release offered for new clusters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub version: String,
    #[serde(default)]
    pub deprecated: bool,
}

pub struct VersionService<'a> {
    client: &'a KubernetesClient,
}

impl<'a> VersionService<'a> {
    pub(crate) fn new(client: &'a KubernetesClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Version>> {
        self.client.send_results(ApiRequest::get("/v1/versions")).await
    }
}
