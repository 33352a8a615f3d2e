use mgc_sdk::{
    blockstorage::{
        BlockStorageClient, CreateSnapshotRequest, CreateVolumeRequest, EXPAND_VOLUME_TYPE,
    },
    CoreClient, IdOrName,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let storage = BlockStorageClient::new(CoreClient::from_env()?);

    for volume_type in storage.volume_types().list_all().await? {
        println!(
            "type {} ({}) iops={}",
            volume_type.name, volume_type.disk_type, volume_type.iops.total
        );
    }

    let volume_id = storage
        .volumes()
        .create(&CreateVolumeRequest {
            name: "demo-volume".to_owned(),
            size: 10,
            volume_type: IdOrName::name("cloud_nvme1k"),
            ..Default::default()
        })
        .await?;
    println!("created volume {volume_id}");

    let volume = storage
        .volumes()
        .get(&volume_id, &[EXPAND_VOLUME_TYPE])
        .await?;
    println!("volume {} is {} / {}", volume.name, volume.state, volume.status);

    let snapshot_id = storage
        .snapshots()
        .create(&CreateSnapshotRequest {
            name: "demo-snapshot".to_owned(),
            volume: Some(IdOrName::id(&volume_id)),
            ..Default::default()
        })
        .await?;
    println!("requested snapshot {snapshot_id}");

    for volume in storage.volumes().list_all(&[]).await? {
        println!("{} {} {}GiB", volume.id, volume.name, volume.size);
    }

    Ok(())
}
