//! Rollback test suite
//!
//! Each test injects a failure into one step of a create and checks that
//! no table changed and the caller's struct was left as passed in.

use kea_config_storage::{repository, writer, ConfigStore, Server, SharedNetwork, Subnet};

use super::fault::{Fault, FaultyStore};
use super::{create_network, ensure_server, expected_next_subnet_id};

/// Run all rollback tests
pub async fn run_all<S: ConfigStore>(storage: &S) {
    test_audit_failure_commits_no_subnet(storage).await;
    test_audit_failure_commits_no_shared_network(storage).await;
    test_failure_after_subnet_insert(storage).await;
    test_failure_after_shared_network_insert(storage).await;
    test_failure_after_server_insert(storage).await;
    test_store_usable_after_rollback(storage).await;
}

/// Test that a failed audit write leaves no subnet behind
pub async fn test_audit_failure_commits_no_subnet<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "rollback").await;
    let network = create_network(storage, &server, "rollback-net").await;
    let faulty = FaultyStore::new(storage, Fault::Audit);
    let before = storage.row_counts().await.expect("row counts should succeed");

    let mut subnet = Subnet::new("10.30.0.0/24");
    let original = subnet.clone();
    let result = writer::create_subnet(&faulty, &server, &network, &mut subnet).await;

    assert!(result.is_err());
    assert_eq!(subnet, original);
    assert_eq!(
        storage.row_counts().await.expect("row counts should succeed"),
        before
    );
    assert!(!repository::subnet_exists(storage, "10.30.0.0/24")
        .await
        .expect("subnet_exists should succeed"));
}

/// Test that a failed audit write leaves no shared network behind
pub async fn test_audit_failure_commits_no_shared_network<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "rollback").await;
    let faulty = FaultyStore::new(storage, Fault::Audit);
    let before = storage.row_counts().await.expect("row counts should succeed");

    let mut network = SharedNetwork::new("rollback-audit-net");
    let result = writer::create_shared_network(&faulty, &server, &mut network).await;

    assert!(result.is_err());
    assert_eq!(network.id, 0);
    assert_eq!(
        storage.row_counts().await.expect("row counts should succeed"),
        before
    );
}

/// Test that a subnet row already written in the transaction is discarded
pub async fn test_failure_after_subnet_insert<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "rollback").await;
    let network = repository::find_shared_network(storage, "rollback-net")
        .await
        .expect("find_shared_network should succeed")
        .expect("shared network should exist");
    let faulty = FaultyStore::new(storage, Fault::AfterSubnetInsert);
    let before = storage.row_counts().await.expect("row counts should succeed");

    let mut subnet = Subnet::new("10.31.0.0/24");
    let result = writer::create_subnet(&faulty, &server, &network, &mut subnet).await;

    assert!(result.is_err());
    assert!(subnet.id.is_none());
    assert_eq!(
        storage.row_counts().await.expect("row counts should succeed"),
        before,
        "audit, subnet and association rows must all be rolled back"
    );
}

/// Test that a network row and its associations are discarded together
pub async fn test_failure_after_shared_network_insert<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "rollback").await;
    let faulty = FaultyStore::new(storage, Fault::AfterSharedNetworkInsert);
    let before = storage.row_counts().await.expect("row counts should succeed");

    let mut network = SharedNetwork::new("rollback-late-net");
    let result = writer::create_shared_network(&faulty, &server, &mut network).await;

    assert!(result.is_err());
    assert_eq!(
        storage.row_counts().await.expect("row counts should succeed"),
        before
    );
    assert!(!repository::shared_network_exists(storage, "rollback-late-net")
        .await
        .expect("shared_network_exists should succeed"));
}

/// Test that a server row is discarded with its audit revision
pub async fn test_failure_after_server_insert<S: ConfigStore>(storage: &S) {
    let faulty = FaultyStore::new(storage, Fault::AfterServerInsert);
    let before = storage.row_counts().await.expect("row counts should succeed");

    let mut server = Server::new("rollback-late", "");
    let result = writer::create_server(&faulty, &mut server).await;

    assert!(result.is_err());
    assert_eq!(server.id, 0);
    assert_eq!(
        storage.row_counts().await.expect("row counts should succeed"),
        before
    );
}

/// Test that the rolled-back ID is handed out again by the next create
pub async fn test_store_usable_after_rollback<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "rollback").await;
    let network = repository::find_shared_network(storage, "rollback-net")
        .await
        .expect("find_shared_network should succeed")
        .expect("shared network should exist");
    let expected = expected_next_subnet_id(storage).await;

    let mut subnet = Subnet::new("10.31.0.0/24");
    writer::create_subnet(storage, &server, &network, &mut subnet)
        .await
        .expect("create subnet should succeed after rollback");

    assert_eq!(subnet.id, Some(expected));
}
