use mgc_sdk::{
    kubernetes::{ClusterRequest, CreateNodePoolRequest, KubernetesClient},
    CoreClient, MgcError,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let kubernetes = KubernetesClient::new(CoreClient::from_env()?);

    let versions = kubernetes.versions().list().await?;
    let version = versions
        .iter()
        .find(|version| !version.deprecated)
        .map(|version| version.version.clone());

    let flavors = kubernetes.flavors().list().await?;
    let flavor = flavors
        .nodepool
        .first()
        .map(|flavor| flavor.name.clone())
        .ok_or_else(|| anyhow::anyhow!("no node pool flavors offered"))?;

    let created = kubernetes
        .clusters()
        .create(&ClusterRequest {
            name: "demo-cluster".to_owned(),
            version,
            node_pools: vec![CreateNodePoolRequest {
                name: "default".to_owned(),
                flavor,
                replicas: 1,
                ..Default::default()
            }],
            ..Default::default()
        })
        .await?;
    println!("cluster {} is {}", created.id, created.status.state);

    match kubernetes.clusters().kubeconfig(&created.id).await {
        Ok(config) => println!("current context: {}", config.current_context),
        Err(err) if err.is_not_found() => println!("kubeconfig not ready yet"),
        Err(MgcError::Http { status, body }) => println!("kubeconfig failed ({status}): {body}"),
        Err(err) => return Err(err.into()),
    }

    for cluster in kubernetes.clusters().list_all().await? {
        println!("{} {} {}", cluster.id, cluster.name, cluster.version);
    }

    Ok(())
}
