//! Block storage: volumes, snapshots, snapshot schedulers and volume types.
//!
//! ```no_run
//! use mgc_sdk::{blockstorage::BlockStorageClient, CoreClient};
//!
//! # async fn run() -> mgc_sdk::Result<()> {
//! let storage = BlockStorageClient::new(CoreClient::from_env()?);
//! for volume in storage.volumes().list_all(&[]).await? {
//!     println!("{} {}", volume.id, volume.name);
//! }
//! # Ok(())
//! # }
//! ```

mod schedulers;
mod snapshots;
mod volume_types;
mod volumes;

pub use schedulers::{
    CreateSchedulerRequest, DailyFrequency, Frequency, ListSchedulersResponse, Scheduler,
    SchedulerPolicy, SchedulerService, SchedulerSnapshotConfig, SchedulerState,
};
pub use snapshots::{
    CreateSnapshotRequest, Snapshot, SnapshotService, SnapshotState, SnapshotStatus, EXPAND_VOLUME,
};
pub use volume_types::{
    DiskType, ListVolumeTypesOptions, ListVolumeTypesResponse, VolumeType, VolumeTypeService,
};
pub use volumes::{
    AttachmentInstance, CreateVolumeRequest, ExtendVolumeRequest, Iops, ListVolumesResponse,
    RetypeVolumeRequest, Volume, VolumeAttachment, VolumeService, VolumeState, VolumeStatus,
    VolumeTypeRef, EXPAND_ATTACHMENT, EXPAND_VOLUME_TYPE,
};

use crate::{ApiRequest, CoreClient, Result};
use serde::de::DeserializeOwned;

pub const BASE_PATH: &str = "/volume";

/// Shared listing options for volumes, snapshots and schedulers.
#[derive(Clone, Debug, Default)]
pub struct ListOptions {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sort: Option<String>,
    pub expand: Vec<String>,
}

/// Entry point for the block storage API.
#[derive(Clone, Debug)]
pub struct BlockStorageClient {
    core: CoreClient,
}

impl BlockStorageClient {
    pub fn new(core: CoreClient) -> Self {
        Self { core }
    }

    pub fn volumes(&self) -> VolumeService<'_> {
        VolumeService::new(self)
    }

    pub fn snapshots(&self) -> SnapshotService<'_> {
        SnapshotService::new(self)
    }

    pub fn schedulers(&self) -> SchedulerService<'_> {
        SchedulerService::new(self)
    }

    pub fn volume_types(&self) -> VolumeTypeService<'_> {
        VolumeTypeService::new(self)
    }

    pub(crate) async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.core.send(request.prefixed(BASE_PATH)).await
    }

    pub(crate) async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.core.send_empty(request.prefixed(BASE_PATH)).await
    }
}
