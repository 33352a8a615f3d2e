use serde::{Deserialize, Serialize};

use super::{registry_path, ContainerRegistryClient};
use crate::error::ensure_not_empty;
use crate::{
    collect_pages, ApiRequest, PaginatedResponse, QueryParams, Result, DEFAULT_PAGE_LIMIT,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub registry_name: String,
    pub name: String,
    #[serde(default)]
    pub image_count: u64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Clone, Debug, Default)]
pub struct RepositoryListOptions {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sort: Option<String>,
}

pub struct RepositoriesService<'a> {
    client: &'a ContainerRegistryClient,
}

impl<'a> RepositoriesService<'a> {
    pub(crate) fn new(client: &'a ContainerRegistryClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        registry_id: &str,
        opts: &RepositoryListOptions,
    ) -> Result<PaginatedResponse<Repository>> {
        ensure_not_empty("registry_id", registry_id)?;
        let mut query = QueryParams::new();
        query.paging(opts.limit, opts.offset, opts.sort.as_deref());

        self.client
            .send(ApiRequest::get(repositories_path(registry_id)).query(query))
            .await
    }

    pub async fn list_all(
        &self,
        registry_id: &str,
        sort: Option<&str>,
    ) -> Result<Vec<Repository>> {
        collect_pages(DEFAULT_PAGE_LIMIT, |offset, limit| {
            let opts = RepositoryListOptions {
                limit: Some(limit),
                offset: Some(offset),
                sort: sort.map(str::to_owned),
            };
            async move {
                self.list(registry_id, &opts)
                    .await
                    .map(|page| page.results)
            }
        })
        .await
    }

    pub async fn get(&self, registry_id: &str, repository: &str) -> Result<Repository> {
        ensure_not_empty("registry_id", registry_id)?;
        ensure_not_empty("repository_name", repository)?;
        self.client
            .send(ApiRequest::get(repository_path(registry_id, repository)))
            .await
    }

    pub async fn delete(&self, registry_id: &str, repository: &str) -> Result<()> {
        ensure_not_empty("registry_id", registry_id)?;
        ensure_not_empty("repository_name", repository)?;
        self.client
            .send_empty(ApiRequest::delete(repository_path(registry_id, repository)))
            .await
    }
}

fn repositories_path(registry_id: &str) -> String {
    format!("{}/repositories", registry_path(registry_id))
}

pub(super) fn repository_path(registry_id: &str, repository: &str) -> String {
    format!("{}/{repository}", repositories_path(registry_id))
}
