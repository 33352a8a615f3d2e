//! Virtual machines: instances, images and machine types.

mod images;
mod instances;
mod machine_types;

pub use images::{Image, ImageListOptions, ImageService, ImageStatus, MinimumRequirements};
pub use instances::{
    CreateInstanceRequest, CreateNetwork, CreateNetworkInterface, InitLogResponse, Instance,
    InstanceImage, InstanceListOptions, InstanceMachineType, InstanceNetwork, InstanceService,
    IpAddresses, NetworkInterface, NicRequest, NicRequestInterface, RetypeInstanceRequest,
    WindowsPassword, WindowsPasswordResponse, API_VERSION, API_VERSION_HEADER, EXPAND_IMAGE,
    EXPAND_MACHINE_TYPE, EXPAND_NETWORK,
};
pub use machine_types::{MachineType, MachineTypeListOptions, MachineTypeService};

use crate::{ApiRequest, CoreClient, Result};
use serde::de::DeserializeOwned;

pub const BASE_PATH: &str = "/compute";

/// Entry point for the compute API.
#[derive(Clone, Debug)]
pub struct VirtualMachineClient {
    core: CoreClient,
}

impl VirtualMachineClient {
    pub fn new(core: CoreClient) -> Self {
        Self { core }
    }

    pub fn instances(&self) -> InstanceService<'_> {
        InstanceService::new(self)
    }

    pub fn images(&self) -> ImageService<'_> {
        ImageService::new(self)
    }

    pub fn machine_types(&self) -> MachineTypeService<'_> {
        MachineTypeService::new(self)
    }

    pub(crate) async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.core.send(request.prefixed(BASE_PATH)).await
    }

    pub(crate) async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.core.send_empty(request.prefixed(BASE_PATH)).await
    }
}
