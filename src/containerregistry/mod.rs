//! Container registry: registries, repositories, images and credentials.

mod credentials;
mod images;
mod registries;
mod repositories;

pub use credentials::{Credentials, CredentialsService};
pub use images::{
    Image, ImageListOptions, ImageTag, ImagesService, EXPAND_EXTRA_ATTR,
    EXPAND_MANIFEST_MEDIA_TYPE, EXPAND_MEDIA_TYPE, EXPAND_TAGS_DETAILS,
};
pub use registries::{
    CreateRegistryRequest, RegistriesService, Registry, RegistryListOptions,
};
pub use repositories::{RepositoriesService, Repository, RepositoryListOptions};

use crate::{ApiRequest, CoreClient, Result};
use serde::de::DeserializeOwned;

pub const BASE_PATH: &str = "/container-registry";

/// Entry point for the container registry API.
#[derive(Clone, Debug)]
pub struct ContainerRegistryClient {
    core: CoreClient,
}

impl ContainerRegistryClient {
    pub fn new(core: CoreClient) -> Self {
        Self { core }
    }

    pub fn registries(&self) -> RegistriesService<'_> {
        RegistriesService::new(self)
    }

    pub fn repositories(&self) -> RepositoriesService<'_> {
        RepositoriesService::new(self)
    }

    pub fn images(&self) -> ImagesService<'_> {
        ImagesService::new(self)
    }

    pub fn credentials(&self) -> CredentialsService<'_> {
        CredentialsService::new(self)
    }

    pub(crate) async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.core.send(request.prefixed(BASE_PATH)).await
    }

    pub(crate) async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.core.send_empty(request.prefixed(BASE_PATH)).await
    }
}

fn registry_path(registry_id: &str) -> String {
    format!("/v0/registries/{registry_id}")
}
