//! Subnet ID Allocator test suite
//!
//! IDs must form a contiguous run starting at 1 for serialized creations.

use kea_config_storage::{allocator, writer, ConfigStore, StorageError, Subnet, SubnetId};

use super::{ensure_server, expected_next_subnet_id};

/// Run all allocator tests
pub async fn run_all<S: ConfigStore>(storage: &S) {
    test_first_subnet_gets_id_one(storage).await;
    test_ids_are_contiguous(storage).await;
    test_next_id_inside_transaction(storage).await;
    test_failed_create_does_not_consume_id(storage).await;
    test_caller_supplied_id_is_replaced(storage).await;
    test_ids_match_listing(storage).await;
}

/// Test that the first subnet of an empty store gets ID 1
pub async fn test_first_subnet_gets_id_one<S: ConfigStore>(storage: &S) {
    let subnets = storage
        .list_subnets()
        .await
        .expect("list subnets should succeed");
    assert!(
        subnets.is_empty(),
        "allocator suite must start on a fresh store"
    );

    let server = ensure_server(storage, "allocator").await;
    let mut subnet = Subnet::new("10.1.0.0/24");
    writer::create_unassigned_subnet(storage, &server, &mut subnet)
        .await
        .expect("create subnet should succeed");

    assert_eq!(subnet.id, Some(SubnetId::FIRST));
}

/// Test that serialized creations never skip or repeat an ID
pub async fn test_ids_are_contiguous<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "allocator").await;
    let start = expected_next_subnet_id(storage).await;

    let mut assigned = Vec::new();
    for octet in 0..5u8 {
        let mut subnet = Subnet::new(format!("10.2.{}.0/24", octet));
        writer::create_unassigned_subnet(storage, &server, &mut subnet)
            .await
            .expect("create subnet should succeed");
        assigned.push(subnet.id.expect("created subnet should carry its id").get());
    }

    let expected: Vec<u32> = (start.get()..start.get() + 5).collect();
    assert_eq!(assigned, expected);
}

/// Test the allocator directly inside an open transaction
pub async fn test_next_id_inside_transaction<S: ConfigStore>(storage: &S) {
    let expected = expected_next_subnet_id(storage).await;

    let mut tx = storage.begin().await.expect("begin should succeed");
    let next = allocator::next_subnet_id(tx.as_mut())
        .await
        .expect("allocation should succeed");
    tx.rollback().await.expect("rollback should succeed");

    assert_eq!(next, expected);

    // Allocation alone reserves nothing
    assert_eq!(expected_next_subnet_id(storage).await, expected);
}

/// Test that a failed create leaves no gap in the ID sequence
pub async fn test_failed_create_does_not_consume_id<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "allocator").await;
    let expected = expected_next_subnet_id(storage).await;

    let mut duplicate = Subnet::new("10.1.0.0/24");
    let result = writer::create_unassigned_subnet(storage, &server, &mut duplicate).await;
    assert!(matches!(
        result,
        Err(StorageError::DuplicateEntity { entity_type: "subnet", .. })
    ));

    let mut subnet = Subnet::new("10.3.0.0/24");
    writer::create_unassigned_subnet(storage, &server, &mut subnet)
        .await
        .expect("create subnet should succeed");
    assert_eq!(subnet.id, Some(expected));
}

/// Test that an ID set by the caller is ignored
pub async fn test_caller_supplied_id_is_replaced<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "allocator").await;
    let expected = expected_next_subnet_id(storage).await;

    let mut subnet = Subnet::new("10.4.0.0/24");
    subnet.id = Some(SubnetId::new(9000));
    writer::create_unassigned_subnet(storage, &server, &mut subnet)
        .await
        .expect("create subnet should succeed");

    assert_eq!(subnet.id, Some(expected));
}

/// Test that all stored IDs are exactly 1..=n
pub async fn test_ids_match_listing<S: ConfigStore>(storage: &S) {
    let subnets = storage
        .list_subnets()
        .await
        .expect("list subnets should succeed");

    let ids: Vec<u32> = subnets
        .iter()
        .map(|s| s.id.expect("stored subnet should have an id").get())
        .collect();
    let expected: Vec<u32> = (1..=subnets.len() as u32).collect();
    assert_eq!(ids, expected);
}
