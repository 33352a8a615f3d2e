mod common;

use axum::http::{Method, StatusCode};
use common::{spawn_server, MockResponse};
use mgc_sdk::blockstorage::{
    BlockStorageClient, CreateSchedulerRequest, CreateSnapshotRequest, CreateVolumeRequest,
    DailyFrequency, ExtendVolumeRequest, Frequency, ListOptions, ListVolumeTypesOptions,
    SchedulerPolicy, SchedulerSnapshotConfig, SchedulerState, VolumeState, VolumeStatus,
    EXPAND_ATTACHMENT, EXPAND_VOLUME, EXPAND_VOLUME_TYPE,
};
use mgc_sdk::{IdOrName, MgcError};
use serde_json::{json, Value as JsonValue};

fn volume(id: usize) -> JsonValue {
    json!({
        "id": format!("vol-{id}"),
        "name": format!("volume-{id}"),
        "size": 10,
        "status": "completed",
        "state": "available",
        "type": {"id": "type-1"},
        "availability_zone": "br-se1-a",
        "created_at": "2024-01-01T00:00:00Z"
    })
}

fn volume_page(range: std::ops::Range<usize>) -> MockResponse {
    let volumes: Vec<JsonValue> = range.map(volume).collect();
    MockResponse::ok(json!({
        "meta": {"page": {"count": volumes.len(), "limit": 50, "offset": 0, "total": 125}},
        "volumes": volumes
    }))
}

#[tokio::test]
async fn list_all_walks_pages_until_a_short_one() {
    let server = spawn_server(vec![
        volume_page(0..50),
        volume_page(50..100),
        volume_page(100..125),
    ])
    .await;
    let storage = BlockStorageClient::new(server.client());

    let volumes = storage
        .volumes()
        .list_all(&[EXPAND_VOLUME_TYPE])
        .await
        .expect("list_all must succeed");

    assert_eq!(volumes.len(), 125);
    assert_eq!(volumes[0].id, "vol-0");
    assert_eq!(volumes[124].id, "vol-124");
    assert_eq!(volumes[0].state, VolumeState::Available);
    assert_eq!(volumes[0].status, VolumeStatus::Other("completed".to_owned()));

    let requests = server.requests();
    assert_eq!(requests.len(), 3);
    let offsets: Vec<_> = requests
        .iter()
        .map(|request| request.query_value("_offset").map(str::to_owned))
        .collect();
    assert_eq!(
        offsets,
        vec![Some("0".to_owned()), Some("50".to_owned()), Some("100".to_owned())]
    );
    assert!(requests
        .iter()
        .all(|request| request.query_value("_limit") == Some("50")));
    assert_eq!(requests[0].path, "/volume/v1/volumes");
    assert_eq!(requests[0].query_values("expand"), vec![EXPAND_VOLUME_TYPE]);
}

#[tokio::test]
async fn list_all_stops_on_first_error() {
    let server = spawn_server(vec![
        volume_page(0..50),
        MockResponse::json(StatusCode::BAD_REQUEST, json!({"message": "bad offset"})),
    ])
    .await;
    let storage = BlockStorageClient::new(server.client());

    let err = storage
        .volumes()
        .list_all(&[])
        .await
        .expect_err("second page must fail");

    assert_eq!(err.status(), Some(400));
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn list_sends_repeated_expand() {
    let server = spawn_server(vec![volume_page(0..1)]).await;
    let storage = BlockStorageClient::new(server.client());

    let page = storage
        .volumes()
        .list(&ListOptions {
            limit: Some(10),
            sort: Some("created_at:desc".to_owned()),
            expand: vec![EXPAND_VOLUME_TYPE.to_owned(), EXPAND_ATTACHMENT.to_owned()],
            ..Default::default()
        })
        .await
        .expect("list must succeed");

    assert_eq!(page.volumes.len(), 1);
    assert_eq!(page.meta.page.total, 125);
    let request = server.last_request();
    assert_eq!(
        request.query_values("expand"),
        vec![EXPAND_VOLUME_TYPE, EXPAND_ATTACHMENT]
    );
    assert_eq!(request.query_value("_sort"), Some("created_at:desc"));
    assert!(request.query_value("_offset").is_none());
}

#[tokio::test]
async fn create_returns_the_new_id() {
    let server = spawn_server(vec![MockResponse::ok(json!({"id": "vol-new"}))]).await;
    let storage = BlockStorageClient::new(server.client());

    let id = storage
        .volumes()
        .create(&CreateVolumeRequest {
            name: "data".to_owned(),
            size: 20,
            volume_type: IdOrName::name("cloud_nvme1k"),
            ..Default::default()
        })
        .await
        .expect("create must succeed");

    assert_eq!(id, "vol-new");
    let request = server.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(
        request.json(),
        json!({"name": "data", "size": 20, "type": {"name": "cloud_nvme1k"}})
    );
}

#[tokio::test]
async fn volume_actions_hit_their_paths() {
    let server = spawn_server(vec![
        MockResponse::no_content(),
        MockResponse::no_content(),
        MockResponse::no_content(),
        MockResponse::no_content(),
        MockResponse::no_content(),
    ])
    .await;
    let storage = BlockStorageClient::new(server.client());
    let volumes = storage.volumes();

    volumes.attach("vol-1", "vm-1").await.expect("attach must succeed");
    volumes.detach("vol-1").await.expect("detach must succeed");
    volumes
        .extend("vol-1", &ExtendVolumeRequest { size: 50 })
        .await
        .expect("extend must succeed");
    volumes.rename("vol-1", "renamed").await.expect("rename must succeed");
    volumes.delete("vol-1").await.expect("delete must succeed");

    let seen: Vec<(Method, String)> = server
        .requests()
        .into_iter()
        .map(|request| (request.method, request.path))
        .collect();
    assert_eq!(
        seen,
        vec![
            (Method::POST, "/volume/v1/volumes/vol-1/attach/vm-1".to_owned()),
            (Method::POST, "/volume/v1/volumes/vol-1/detach".to_owned()),
            (Method::POST, "/volume/v1/volumes/vol-1/extend".to_owned()),
            (Method::PATCH, "/volume/v1/volumes/vol-1/rename".to_owned()),
            (Method::DELETE, "/volume/v1/volumes/vol-1".to_owned()),
        ]
    );
    assert_eq!(server.requests()[3].json(), json!({"name": "renamed"}));
}

#[tokio::test]
async fn empty_ids_fail_before_any_request() {
    let server = spawn_server(Vec::new()).await;
    let storage = BlockStorageClient::new(server.client());

    let err = storage
        .volumes()
        .get("", &[])
        .await
        .expect_err("empty id must be rejected");
    assert!(matches!(err, MgcError::Validation { ref field, .. } if field == "id"));

    let err = storage
        .volumes()
        .attach("vol-1", "  ")
        .await
        .expect_err("blank instance id must be rejected");
    assert!(matches!(err, MgcError::Validation { ref field, .. } if field == "instance_id"));

    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn snapshots_join_expand_and_unwrap_the_list() {
    let server = spawn_server(vec![
        MockResponse::ok(json!({
            "meta": {"page": {"count": 1, "limit": 50, "offset": 0, "total": 1}},
            "snapshots": [{
                "id": "snap-1",
                "name": "nightly",
                "size": 10,
                "state": "available",
                "status": "completed",
                "volume": {"id": "vol-1", "name": "data"},
                "type": "instant"
            }]
        })),
        MockResponse::ok(json!({"id": "snap-2"})),
    ])
    .await;
    let storage = BlockStorageClient::new(server.client());

    let snapshots = storage
        .snapshots()
        .list_all(&[EXPAND_VOLUME])
        .await
        .expect("snapshot list must succeed");
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].snapshot_type, "instant");

    let id = storage
        .snapshots()
        .create(&CreateSnapshotRequest {
            name: "manual".to_owned(),
            volume: Some(IdOrName::id("vol-1")),
            ..Default::default()
        })
        .await
        .expect("snapshot create must succeed");
    assert_eq!(id, "snap-2");

    let requests = server.requests();
    assert_eq!(requests[0].path, "/volume/v1/snapshots");
    assert_eq!(requests[0].query_value("expand"), Some("volume"));
    assert_eq!(requests[1].json()["volume"], json!({"id": "vol-1"}));
}

fn scheduler(id: usize) -> JsonValue {
    json!({
        "id": format!("sched-{id}"),
        "name": format!("scheduler-{id}"),
        "volumes": ["vol-1"],
        "snapshot": {"type": "instant"},
        "state": "available",
        "policy": {
            "retention_in_days": 7,
            "frequency": {"daily": {"start_time": "03:00:00"}}
        },
        "created_at": "2024-05-01T00:00:00Z",
        "updated_at": "2024-05-01T00:00:00Z"
    })
}

#[tokio::test]
async fn schedulers_list_all_keeps_sort_and_expand() {
    let first: Vec<JsonValue> = (0..50).map(scheduler).collect();
    let server = spawn_server(vec![
        MockResponse::ok(json!({"meta": {"page": {"count": 50}}, "schedulers": first})),
        MockResponse::ok(json!({"meta": {"page": {"count": 1}}, "schedulers": [scheduler(50)]})),
    ])
    .await;
    let storage = BlockStorageClient::new(server.client());

    let schedulers = storage
        .schedulers()
        .list_all(Some("name:asc"), &[EXPAND_VOLUME])
        .await
        .expect("schedulers must list");

    assert_eq!(schedulers.len(), 51);
    assert_eq!(schedulers[50].id, "sched-50");
    assert_eq!(schedulers[0].state, SchedulerState::Available);
    assert_eq!(schedulers[0].volumes, vec!["vol-1".to_owned()]);

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    for (request, offset) in requests.iter().zip(["0", "50"]) {
        assert_eq!(request.path, "/volume/v1/schedulers");
        assert_eq!(request.query_value("_offset"), Some(offset));
        assert_eq!(request.query_value("_limit"), Some("50"));
        assert_eq!(request.query_value("_sort"), Some("name:asc"));
        assert_eq!(request.query_values("expand"), vec!["volume"]);
    }
}

#[tokio::test]
async fn scheduler_lifecycle_hits_its_paths() {
    let server = spawn_server(vec![
        MockResponse::ok(json!({"id": "sched-9"})),
        MockResponse::ok(scheduler(9)),
        MockResponse::no_content(),
        MockResponse::no_content(),
        MockResponse::no_content(),
    ])
    .await;
    let storage = BlockStorageClient::new(server.client());
    let schedulers = storage.schedulers();

    let id = schedulers
        .create(&CreateSchedulerRequest {
            name: "nightly".to_owned(),
            description: Some("keep a week".to_owned()),
            snapshot: SchedulerSnapshotConfig {
                snapshot_type: "instant".to_owned(),
            },
            policy: SchedulerPolicy {
                retention_in_days: 7,
                frequency: Frequency {
                    daily: DailyFrequency {
                        start_time: "03:00:00".to_owned(),
                    },
                },
            },
        })
        .await
        .expect("create must succeed");
    assert_eq!(id, "sched-9");

    let found = schedulers
        .get(&id, &[EXPAND_VOLUME])
        .await
        .expect("get must succeed");
    assert_eq!(found.policy.retention_in_days, 7);

    schedulers
        .attach_volume(&id, &IdOrName::id("vol-1"))
        .await
        .expect("attach must succeed");
    schedulers
        .detach_volume(&id, &IdOrName::name("data"))
        .await
        .expect("detach must succeed");
    schedulers.delete(&id).await.expect("delete must succeed");

    let requests = server.requests();
    let seen: Vec<(Method, &str)> = requests
        .iter()
        .map(|request| (request.method.clone(), request.path.as_str()))
        .collect();
    assert_eq!(
        seen,
        vec![
            (Method::POST, "/volume/v1/schedulers"),
            (Method::GET, "/volume/v1/schedulers/sched-9"),
            (Method::POST, "/volume/v1/schedulers/sched-9/attach"),
            (Method::POST, "/volume/v1/schedulers/sched-9/detach"),
            (Method::DELETE, "/volume/v1/schedulers/sched-9"),
        ]
    );
    assert_eq!(requests[0].json()["description"], json!("keep a week"));
    assert_eq!(requests[1].query_values("expand"), vec!["volume"]);
    assert_eq!(requests[2].json(), json!({"volume": {"id": "vol-1"}}));
    assert_eq!(requests[3].json(), json!({"volume": {"name": "data"}}));
}

#[tokio::test]
async fn scheduler_ids_are_required() {
    let server = spawn_server(Vec::new()).await;
    let storage = BlockStorageClient::new(server.client());

    let err = storage
        .schedulers()
        .attach_volume("", &IdOrName::id("vol-1"))
        .await
        .expect_err("empty id must be rejected");
    assert!(matches!(err, MgcError::Validation { ref field, .. } if field == "id"));
    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn volume_type_filters_skip_empty_values() {
    let server = spawn_server(vec![MockResponse::ok(json!({
        "meta": {"page": {"count": 1, "limit": 50, "offset": 0, "total": 1}},
        "types": [{
            "id": "type-1",
            "name": "cloud_nvme1k",
            "disk_type": "nvme",
            "status": "active",
            "iops": {"read": 1000, "write": 1000, "total": 2000},
            "availability_zones": ["br-se1-a"],
            "allows_encryption": true
        }]
    }))])
    .await;
    let storage = BlockStorageClient::new(server.client());

    let response = storage
        .volume_types()
        .list(&ListVolumeTypesOptions {
            availability_zone: Some("br-se1-a".to_owned()),
            name: Some(String::new()),
            allows_encryption: Some(true),
            ..Default::default()
        })
        .await
        .expect("volume types must list");

    assert_eq!(response.types[0].iops.total, 2000);
    let request = server.last_request();
    assert_eq!(request.path, "/volume/v1/volume-types");
    assert_eq!(request.query_value("availability-zone"), Some("br-se1-a"));
    assert_eq!(request.query_value("allows-encryption"), Some("true"));
    assert!(request.query_value("name").is_none());
}
