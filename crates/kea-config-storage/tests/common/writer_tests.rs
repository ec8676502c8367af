//! Configuration Writer test suite

use kea_config_storage::{
    repository, writer, ConfigStore, Server, SharedNetwork, StorageError, Subnet,
};

use super::{create_network, ensure_server};

/// Run all writer tests
pub async fn run_all<S: ConfigStore>(storage: &S) {
    test_create_server_records_audit(storage).await;
    test_duplicate_server_tag(storage).await;
    test_network_then_subnet_share_server(storage).await;
    test_create_shared_network_records_audit(storage).await;
    test_create_subnet_records_audit(storage).await;
    test_duplicate_shared_network_name(storage).await;
    test_duplicate_prefix_leaves_counts_unchanged(storage).await;
    test_unknown_server_rolls_back(storage).await;
    test_missing_shared_network_rolls_back(storage).await;
    test_unassigned_subnet(storage).await;
    test_invalid_prefix_rejected_before_store(storage).await;
    test_one_revision_per_create(storage).await;
}

async fn last_revision<S: ConfigStore>(storage: &S) -> kea_config_storage::AuditRevision {
    storage
        .list_audit_revisions()
        .await
        .expect("list audit revisions should succeed")
        .pop()
        .expect("at least one audit revision should exist")
}

/// Test that a new server is audited under its own tag
pub async fn test_create_server_records_audit<S: ConfigStore>(storage: &S) {
    let mut server = Server::new("writer-east", "east campus");
    writer::create_server(storage, &mut server)
        .await
        .expect("create server should succeed");

    let revision = last_revision(storage).await;
    assert_eq!(revision.server_tag, "writer-east");
    assert_eq!(revision.message, "add new server: writer-east");
    assert!(revision.affects_config);
}

/// Test that a second server with the same tag is a duplicate
pub async fn test_duplicate_server_tag<S: ConfigStore>(storage: &S) {
    ensure_server(storage, "writer-dup").await;
    let before = storage.row_counts().await.expect("row counts should succeed");

    let mut again = Server::new("writer-dup", "second attempt");
    let result = writer::create_server(storage, &mut again).await;

    match result {
        Err(StorageError::DuplicateEntity { entity_type, key }) => {
            assert_eq!(entity_type, "server");
            assert_eq!(key, "writer-dup");
        }
        other => panic!("Expected DuplicateEntity, got {:?}", other),
    }
    assert_eq!(again.id, 0, "failed create must not assign an id");
    assert_eq!(
        storage.row_counts().await.expect("row counts should succeed"),
        before
    );
}

/// Test that a subnet created in a network references it by name and
/// that the creating server is associated with both
pub async fn test_network_then_subnet_share_server<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "writer-west").await;
    let network = create_network(storage, &server, "writer-floor-1").await;
    assert_eq!(network.servers.len(), 1);
    assert_eq!(network.servers[0].tag, "writer-west");

    let mut subnet = Subnet::new("10.20.0.0/22");
    writer::create_subnet(storage, &server, &network, &mut subnet)
        .await
        .expect("create subnet should succeed");

    assert_eq!(subnet.shared_network_name.as_deref(), Some(network.name.as_str()));

    let stored_network = repository::find_shared_network(storage, "writer-floor-1")
        .await
        .expect("find_shared_network should succeed")
        .expect("shared network should exist");
    let stored_subnet = repository::find_subnet(storage, "10.20.0.0/22")
        .await
        .expect("find_subnet should succeed")
        .expect("subnet should exist");

    assert_eq!(
        stored_subnet.shared_network_name.as_deref(),
        Some(stored_network.name.as_str())
    );
    assert!(stored_network.servers.iter().any(|s| s.tag == "writer-west"));
    assert!(stored_subnet.servers.iter().any(|s| s.tag == "writer-west"));
}

/// Test the shared network audit message
pub async fn test_create_shared_network_records_audit<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "writer-west").await;
    create_network(storage, &server, "writer-floor-2").await;

    let revision = last_revision(storage).await;
    assert_eq!(revision.server_tag, "writer-west");
    assert_eq!(revision.message, "add new shared network: writer-floor-2");
    assert!(revision.affects_config);
}

/// Test the subnet audit message, tagged with the acting server
pub async fn test_create_subnet_records_audit<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "writer-west").await;
    let network = repository::find_shared_network(storage, "writer-floor-2")
        .await
        .expect("find_shared_network should succeed")
        .expect("shared network should exist");

    let mut subnet = Subnet::new("10.21.0.0/24");
    writer::create_subnet(storage, &server, &network, &mut subnet)
        .await
        .expect("create subnet should succeed");

    let revision = last_revision(storage).await;
    assert_eq!(revision.server_tag, "writer-west");
    assert_eq!(revision.message, "add new subnet: 10.21.0.0/24");
    assert!(revision.affects_config);
}

/// Test that a second network with the same name is a duplicate
pub async fn test_duplicate_shared_network_name<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "writer-west").await;
    let before = storage.row_counts().await.expect("row counts should succeed");

    let mut network = SharedNetwork::new("writer-floor-1");
    let result = writer::create_shared_network(storage, &server, &mut network).await;

    assert!(matches!(
        result,
        Err(StorageError::DuplicateEntity {
            entity_type: "shared network",
            ..
        })
    ));
    assert!(network.servers.is_empty(), "input must be left untouched");
    assert_eq!(
        storage.row_counts().await.expect("row counts should succeed"),
        before
    );
}

/// Test that a duplicate prefix fails and changes no table
pub async fn test_duplicate_prefix_leaves_counts_unchanged<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "writer-west").await;
    let network = repository::find_shared_network(storage, "writer-floor-1")
        .await
        .expect("find_shared_network should succeed")
        .expect("shared network should exist");
    let before = storage.row_counts().await.expect("row counts should succeed");

    let mut duplicate = Subnet::new("10.20.0.0/22");
    let result = writer::create_subnet(storage, &server, &network, &mut duplicate).await;

    match result {
        Err(StorageError::DuplicateEntity { entity_type, key }) => {
            assert_eq!(entity_type, "subnet");
            assert_eq!(key, "10.20.0.0/22");
        }
        other => panic!("Expected DuplicateEntity, got {:?}", other),
    }
    assert!(duplicate.id.is_none());
    assert_eq!(
        storage.row_counts().await.expect("row counts should succeed"),
        before
    );
}

/// Test that an acting server missing from the store aborts the create
pub async fn test_unknown_server_rolls_back<S: ConfigStore>(storage: &S) {
    let ghost = Server::new("writer-ghost", "never created");
    let before = storage.row_counts().await.expect("row counts should succeed");

    let mut network = SharedNetwork::new("writer-ghost-net");
    let result = writer::create_shared_network(storage, &ghost, &mut network).await;

    match result {
        Err(StorageError::NotFound { entity_type, key }) => {
            assert_eq!(entity_type, "server");
            assert_eq!(key, "writer-ghost");
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }
    assert_eq!(
        storage.row_counts().await.expect("row counts should succeed"),
        before
    );
    assert!(!repository::shared_network_exists(storage, "writer-ghost-net")
        .await
        .expect("shared_network_exists should succeed"));
}

/// Test that referencing a network that was never created fails cleanly
pub async fn test_missing_shared_network_rolls_back<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "writer-west").await;
    let before = storage.row_counts().await.expect("row counts should succeed");

    let phantom = SharedNetwork::new("writer-phantom");
    let mut subnet = Subnet::new("10.22.0.0/24");
    let result = writer::create_subnet(storage, &server, &phantom, &mut subnet).await;

    assert!(result.is_err(), "foreign key must reject the subnet");
    assert_eq!(
        storage.row_counts().await.expect("row counts should succeed"),
        before
    );
}

/// Test a subnet created outside any shared network
pub async fn test_unassigned_subnet<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "writer-west").await;

    let mut subnet = Subnet::new("10.23.0.0/24");
    writer::create_unassigned_subnet(storage, &server, &mut subnet)
        .await
        .expect("create subnet should succeed");

    let stored = repository::find_subnet(storage, "10.23.0.0/24")
        .await
        .expect("find_subnet should succeed")
        .expect("subnet should exist");
    assert!(stored.shared_network_name.is_none());
    assert_eq!(stored.id, subnet.id);
    assert_eq!(stored.servers.len(), 1);
}

/// Test that malformed input fails without touching the store
pub async fn test_invalid_prefix_rejected_before_store<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "writer-west").await;
    let before = storage.row_counts().await.expect("row counts should succeed");

    for prefix in ["10.24.0.1/24", "10.24.0.0/33", "not-a-prefix", ""] {
        let mut subnet = Subnet::new(prefix);
        let result = writer::create_unassigned_subnet(storage, &server, &mut subnet).await;
        assert!(
            matches!(result, Err(StorageError::Validation(_))),
            "prefix {:?} should fail validation, got {:?}",
            prefix,
            result
        );
    }

    assert_eq!(
        storage.row_counts().await.expect("row counts should succeed"),
        before
    );
}

/// Test that each successful create appends exactly one audit revision
pub async fn test_one_revision_per_create<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "writer-west").await;
    let before = storage.row_counts().await.expect("row counts should succeed");

    let network = create_network(storage, &server, "writer-floor-3").await;
    let mut subnet = Subnet::new("10.25.0.0/24");
    writer::create_subnet(storage, &server, &network, &mut subnet)
        .await
        .expect("create subnet should succeed");

    let after = storage.row_counts().await.expect("row counts should succeed");
    assert_eq!(after.audit_revisions, before.audit_revisions + 2);
    assert_eq!(after.shared_networks, before.shared_networks + 1);
    assert_eq!(after.shared_network_servers, before.shared_network_servers + 1);
    assert_eq!(after.subnets, before.subnets + 1);
    assert_eq!(after.subnet_servers, before.subnet_servers + 1);
}
