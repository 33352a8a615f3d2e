//! `mgc-sdk` is an async client for the Magalu Cloud REST APIs.
//!
//! Every product client wraps a shared [`CoreClient`], which owns
//! authentication, retries with exponential backoff and response decoding:
//! - [`blockstorage::BlockStorageClient`]
//! - [`compute::VirtualMachineClient`]
//! - [`lbaas::LbaasClient`]
//! - [`containerregistry::ContainerRegistryClient`]
//! - [`kubernetes::KubernetesClient`]

mod client;
mod config;
mod error;
mod pagination;
mod request;
mod retry;
mod types;

pub mod blockstorage;
pub mod compute;
pub mod containerregistry;
pub mod kubernetes;
pub mod lbaas;

pub use client::CoreClient;
pub use config::{Config, Region};
pub use error::MgcError;
pub use pagination::{collect_pages, Meta, Page, PaginatedResponse, DEFAULT_PAGE_LIMIT};
pub use request::{ApiRequest, QueryParams};
pub use retry::RetryConfig;
pub use types::{IdOrName, ResourceError};

pub type Result<T> = std::result::Result<T, MgcError>;
