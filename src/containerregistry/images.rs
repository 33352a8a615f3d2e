use serde::{Deserialize, Serialize};

use super::repositories::repository_path;
use super::ContainerRegistryClient;
use crate::error::ensure_not_empty;
use crate::{
    collect_pages, ApiRequest, PaginatedResponse, QueryParams, Result, DEFAULT_PAGE_LIMIT,
};

pub const EXPAND_TAGS_DETAILS: &str = "tags_details";
pub const EXPAND_EXTRA_ATTR: &str = "extra_attr";
pub const EXPAND_MANIFEST_MEDIA_TYPE: &str = "manifest_media_type";
pub const EXPAND_MEDIA_TYPE: &str = "media_type";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTag {
    pub name: String,
    #[serde(default)]
    pub pushed_at: String,
    #[serde(default)]
    pub pulled_at: String,
    #[serde(default)]
    pub signed: bool,
}

/// An image manifest. Fields behind an `_expand` value stay empty unless
/// that value was requested.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub digest: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub pushed_at: String,
    #[serde(default)]
    pub pulled_at: String,
    #[serde(default)]
    pub manifest_media_type: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tags_details: Vec<ImageTag>,
    #[serde(default)]
    pub extra_attr: serde_json::Value,
}

#[derive(Clone, Debug, Default)]
pub struct ImageListOptions {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sort: Option<String>,
    pub expand: Vec<String>,
}

pub struct ImagesService<'a> {
    client: &'a ContainerRegistryClient,
}

impl<'a> ImagesService<'a> {
    pub(crate) fn new(client: &'a ContainerRegistryClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        registry_id: &str,
        repository: &str,
        opts: &ImageListOptions,
    ) -> Result<PaginatedResponse<Image>> {
        ensure_not_empty("registry_id", registry_id)?;
        ensure_not_empty("repository_name", repository)?;
        let mut query = QueryParams::new();
        query
            .paging(opts.limit, opts.offset, opts.sort.as_deref())
            .set_joined("_expand", &opts.expand);

        self.client
            .send(ApiRequest::get(images_path(registry_id, repository)).query(query))
            .await
    }

    /// Lists every image, keeping the sort and expand settings of `opts`.
    pub async fn list_all(
        &self,
        registry_id: &str,
        repository: &str,
        opts: &ImageListOptions,
    ) -> Result<Vec<Image>> {
        collect_pages(DEFAULT_PAGE_LIMIT, |offset, limit| {
            let page = ImageListOptions {
                limit: Some(limit),
                offset: Some(offset),
                ..opts.clone()
            };
            async move {
                self.list(registry_id, repository, &page)
                    .await
                    .map(|page| page.results)
            }
        })
        .await
    }

    /// Fetches an image by digest (`sha256:…`) or tag.
    pub async fn get(
        &self,
        registry_id: &str,
        repository: &str,
        digest_or_tag: &str,
    ) -> Result<Image> {
        ensure_not_empty("registry_id", registry_id)?;
        ensure_not_empty("repository_name", repository)?;
        ensure_not_empty("digest_or_tag", digest_or_tag)?;
        self.client
            .send(ApiRequest::get(image_path(registry_id, repository, digest_or_tag)))
            .await
    }

    pub async fn delete(
        &self,
        registry_id: &str,
        repository: &str,
        digest_or_tag: &str,
    ) -> Result<()> {
        ensure_not_empty("registry_id", registry_id)?;
        ensure_not_empty("repository_name", repository)?;
        ensure_not_empty("digest_or_tag", digest_or_tag)?;
        self.client
            .send_empty(ApiRequest::delete(image_path(
                registry_id,
                repository,
                digest_or_tag,
            )))
            .await
    }
}

fn images_path(registry_id: &str, repository: &str) -> String {
    format!("{}/images", repository_path(registry_id, repository))
}

fn image_path(registry_id: &str, repository: &str, digest_or_tag: &str) -> String {
    format!("{}/{digest_or_tag}", images_path(registry_id, repository))
}
