mod common;

use axum::http::Method;
use common::{spawn_server, MockResponse};
use mgc_sdk::compute::{
    CreateInstanceRequest, ImageListOptions, ImageStatus, InstanceListOptions,
    MachineTypeListOptions, NicRequest, NicRequestInterface, VirtualMachineClient, EXPAND_IMAGE,
    EXPAND_MACHINE_TYPE,
};
use mgc_sdk::IdOrName;
use serde_json::json;

#[tokio::test]
async fn instance_reads_send_the_api_version_header() {
    let server = spawn_server(vec![
        MockResponse::ok(json!({
            "instances": [{
                "id": "vm-1",
                "name": "web",
                "status": "completed",
                "state": "running",
                "machine_type": {"id": "mt-1", "name": "BV1-1-10"},
                "image": {"id": "img-1", "name": "cloud-ubuntu-24.04 LTS"}
            }]
        })),
        MockResponse::ok(json!({"id": "vm-1", "status": "completed", "state": "running"})),
    ])
    .await;
    let compute = VirtualMachineClient::new(server.client());

    let instances = compute
        .instances()
        .list(&InstanceListOptions {
            expand: vec![EXPAND_IMAGE.to_owned(), EXPAND_MACHINE_TYPE.to_owned()],
            name: Some("web".to_owned()),
            ..Default::default()
        })
        .await
        .expect("instance list must succeed");
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].state, "running");

    let instance = compute
        .instances()
        .get("vm-1", &[])
        .await
        .expect("instance get must succeed");
    assert_eq!(instance.id, "vm-1");

    let requests = server.requests();
    assert_eq!(requests[0].path, "/compute/v1/instances");
    assert_eq!(requests[0].header("x-api-version"), Some("1.1"));
    assert_eq!(requests[0].query_value("expand"), Some("image,machine-type"));
    assert_eq!(requests[0].query_value("name"), Some("web"));
    assert_eq!(requests[1].path, "/compute/v1/instances/vm-1");
    assert_eq!(requests[1].header("x-api-version"), Some("1.1"));
    assert!(requests[1].query_value("expand").is_none());
}

#[tokio::test]
async fn create_and_lifecycle_actions() {
    let server = spawn_server(vec![
        MockResponse::ok(json!({"id": "vm-2"})),
        MockResponse::no_content(),
        MockResponse::no_content(),
        MockResponse::no_content(),
        MockResponse::no_content(),
    ])
    .await;
    let compute = VirtualMachineClient::new(server.client());
    let instances = compute.instances();

    let id = instances
        .create(&CreateInstanceRequest {
            name: "api".to_owned(),
            image: IdOrName::name("cloud-ubuntu-24.04 LTS"),
            machine_type: IdOrName::name("BV1-1-10"),
            ssh_key_name: Some("laptop".to_owned()),
            ..Default::default()
        })
        .await
        .expect("create must succeed");
    assert_eq!(id, "vm-2");

    instances.stop("vm-2").await.expect("stop must succeed");
    instances.start("vm-2").await.expect("start must succeed");
    instances.suspend("vm-2").await.expect("suspend must succeed");
    instances.delete("vm-2", true).await.expect("delete must succeed");

    let requests = server.requests();
    assert_eq!(
        requests[0].json(),
        json!({
            "name": "api",
            "image": {"name": "cloud-ubuntu-24.04 LTS"},
            "machine_type": {"name": "BV1-1-10"},
            "ssh_key_name": "laptop"
        })
    );
    let paths: Vec<&str> = requests[1..4].iter().map(|request| request.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "/compute/v1/instances/vm-2/stop",
            "/compute/v1/instances/vm-2/start",
            "/compute/v1/instances/vm-2/suspend",
        ]
    );
    assert_eq!(requests[4].method, Method::DELETE);
    assert_eq!(requests[4].query_value("delete_public_ip"), Some("true"));
}

#[tokio::test]
async fn network_interface_and_logs() {
    let server = spawn_server(vec![
        MockResponse::no_content(),
        MockResponse::ok(json!({"logs": ["line 1", "line 2"]})),
        MockResponse::ok(json!({
            "instance": {"id": "vm-3", "password": "s3cret", "user": "Administrator"}
        })),
    ])
    .await;
    let compute = VirtualMachineClient::new(server.client());

    compute
        .instances()
        .attach_network_interface(&NicRequest {
            instance: IdOrName::id("vm-3"),
            network: NicRequestInterface {
                interface: IdOrName::id("nic-9"),
            },
        })
        .await
        .expect("attach must succeed");

    let logs = compute
        .instances()
        .init_logs("vm-3", Some(100))
        .await
        .expect("logs must load");
    assert_eq!(logs.logs.len(), 2);

    let password = compute
        .instances()
        .first_windows_password("vm-3")
        .await
        .expect("password must load");
    assert_eq!(password.instance.user, "Administrator");

    let requests = server.requests();
    assert_eq!(requests[0].path, "/compute/v1/instances/network-interface/attach");
    assert_eq!(
        requests[0].json(),
        json!({"instance": {"id": "vm-3"}, "network": {"interface": {"id": "nic-9"}}})
    );
    assert_eq!(requests[1].query_value("max-lines-count"), Some("100"));
    assert_eq!(
        requests[2].path,
        "/compute/v1/instances/config/vm-3/first-windows-password"
    );
}

#[tokio::test]
async fn images_and_machine_types_filter_by_zone() {
    let server = spawn_server(vec![
        MockResponse::ok(json!({
            "images": [{
                "id": "img-1",
                "name": "cloud-ubuntu-24.04 LTS",
                "status": "active",
                "minimum_requirements": {"vcpu": 1, "ram": 1024, "disk": 10}
            }]
        })),
        MockResponse::ok(json!({
            "machine_types": [{
                "id": "mt-1",
                "name": "BV1-1-10",
                "vcpus": 1,
                "ram": 1024,
                "disk": 10,
                "status": "active"
            }]
        })),
    ])
    .await;
    let compute = VirtualMachineClient::new(server.client());

    let images = compute
        .images()
        .list_all(&ImageListOptions {
            labels: vec!["ubuntu".to_owned(), "lts".to_owned()],
            availability_zone: Some("br-se1-a".to_owned()),
            ..Default::default()
        })
        .await
        .expect("images must list");
    assert_eq!(images[0].status, ImageStatus::Active);
    assert_eq!(images[0].minimum_requirements.ram, 1024);

    let machine_types = compute
        .machine_types()
        .list(&MachineTypeListOptions {
            availability_zone: Some(String::new()),
            ..Default::default()
        })
        .await
        .expect("machine types must list");
    assert_eq!(machine_types[0].vcpus, 1);

    let requests = server.requests();
    assert_eq!(requests[0].path, "/compute/v1/images");
    assert_eq!(requests[0].query_value("_labels"), Some("ubuntu,lts"));
    assert_eq!(requests[0].query_value("availability-zone"), Some("br-se1-a"));
    assert_eq!(requests[0].query_value("_offset"), Some("0"));
    assert_eq!(requests[1].path, "/compute/v1/machine-types");
    assert!(requests[1].query_value("availability-zone").is_none());
}
