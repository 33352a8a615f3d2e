use std::fmt;

use serde::{Deserialize, Serialize};

use super::ContainerRegistryClient;
use crate::{ApiRequest, Result};

/// Login for `docker login` against the registry endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

pub struct CredentialsService<'a> {
    client: &'a ContainerRegistryClient,
}

impl<'a> CredentialsService<'a> {
    pub(crate) fn new(client: &'a ContainerRegistryClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> Result<Credentials> {
        self.client.send(ApiRequest::get("/v0/credentials")).await
    }

    /// Rotates the password. The previous one stops working immediately.
    pub async fn reset_password(&self) -> Result<Credentials> {
        self.client
            .send(ApiRequest::post("/v0/credentials/password"))
            .await
    }
}
