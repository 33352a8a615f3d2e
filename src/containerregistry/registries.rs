use serde::{Deserialize, Serialize};

use super::{registry_path, ContainerRegistryClient};
use crate::error::ensure_not_empty;
use crate::{
    collect_pages, ApiRequest, PaginatedResponse, QueryParams, Result, DEFAULT_PAGE_LIMIT,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRegistryRequest {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub storage_usage_bytes: u64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Clone, Debug, Default)]
pub struct RegistryListOptions {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sort: Option<String>,
    /// Sent comma-joined as `_expand`.
    pub expand: Vec<String>,
}

pub struct RegistriesService<'a> {
    client: &'a ContainerRegistryClient,
}

impl<'a> RegistriesService<'a> {
    pub(crate) fn new(client: &'a ContainerRegistryClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, request: &CreateRegistryRequest) -> Result<Registry> {
        ensure_not_empty("name", &request.name)?;
        self.client
            .send(ApiRequest::post("/v0/registries").json(request)?)
            .await
    }

    pub async fn list(&self, opts: &RegistryListOptions) -> Result<PaginatedResponse<Registry>> {
        let mut query = QueryParams::new();
        query
            .paging(opts.limit, opts.offset, opts.sort.as_deref())
            .set_joined("_expand", &opts.expand);

        self.client
            .send(ApiRequest::get("/v0/registries").query(query))
            .await
    }

    pub async fn list_all(&self, sort: Option<&str>) -> Result<Vec<Registry>> {
        collect_pages(DEFAULT_PAGE_LIMIT, |offset, limit| {
            let opts = RegistryListOptions {
                limit: Some(limit),
                offset: Some(offset),
                sort: sort.map(str::to_owned),
                expand: Vec::new(),
            };
            async move { self.list(&opts).await.map(|page| page.results) }
        })
        .await
    }

    pub async fn get(&self, registry_id: &str) -> Result<Registry> {
        ensure_not_empty("registry_id", registry_id)?;
        self.client
            .send(ApiRequest::get(registry_path(registry_id)))
            .await
    }

    /// Deletes a registry with every repository and image in it.
    pub async fn delete(&self, registry_id: &str) -> Result<()> {
        ensure_not_empty("registry_id", registry_id)?;
        self.client
            .send_empty(ApiRequest::delete(registry_path(registry_id)))
            .await
    }
}
