//! Shared test harness for storage backends
//!
//! This module provides generic test functions that verify every backend
//! implements the configuration store the same way. All storage backends
//! must pass these tests.
//!
//! # Usage
//!
//! ```ignore
//! use kea_config_storage::backends::sqlite::SqliteStorage;
//!
//! #[tokio::test]
//! async fn sqlite_passes_all_tests() {
//!     let storage = SqliteStorage::new(":memory:").await.unwrap();
//!     storage.initialize().await.unwrap();
//!     common::run_all_tests(&storage).await;
//! }
//! ```
//!
//! # Store state
//!
//! Suites share one store and never delete anything. [`run_all_tests`] and
//! the individual runners expect a freshly initialized store: the allocator
//! suite checks that the very first subnet gets ID 1, the repository suite
//! that no server is tagged `all` yet. Every other test works relative to
//! whatever rows already exist.

#![allow(dead_code)]

pub mod allocator_tests;
pub mod repository_tests;
pub mod rollback_tests;
pub mod writer_tests;

use kea_config_storage::{repository, writer, ConfigStore, Server, SharedNetwork, SubnetId};

/// Run all storage tests
///
/// This is the main entry point for testing a storage backend.
/// It runs all test suites in sequence.
pub async fn run_all_tests<S: ConfigStore>(storage: &S) {
    println!("Running allocator tests...");
    allocator_tests::run_all(storage).await;

    println!("Running repository tests...");
    repository_tests::run_all(storage).await;

    println!("Running writer tests...");
    writer_tests::run_all(storage).await;

    println!("Running rollback tests...");
    rollback_tests::run_all(storage).await;

    println!("All storage tests passed!");
}

/// Run only the Subnet ID Allocator tests
pub async fn run_allocator_tests<S: ConfigStore>(storage: &S) {
    allocator_tests::run_all(storage).await;
}

/// Run only the Entity Repository tests
pub async fn run_repository_tests<S: ConfigStore>(storage: &S) {
    repository_tests::run_all(storage).await;
}

/// Run only the Configuration Writer tests
pub async fn run_writer_tests<S: ConfigStore>(storage: &S) {
    writer_tests::run_all(storage).await;
}

/// Run only the rollback tests
pub async fn run_rollback_tests<S: ConfigStore>(storage: &S) {
    rollback_tests::run_all(storage).await;
}

/// Fetch the server tagged `tag`, creating it first if needed
pub async fn ensure_server<S: ConfigStore + ?Sized>(storage: &S, tag: &str) -> Server {
    if let Some(server) = repository::find_server(storage, tag)
        .await
        .expect("server lookup should succeed")
    {
        return server;
    }

    let mut server = Server::new(tag, format!("{} test server", tag));
    writer::create_server(storage, &mut server)
        .await
        .expect("create server should succeed");
    server
}

/// Create a shared network named `name` assigned to `server`
pub async fn create_network<S: ConfigStore + ?Sized>(
    storage: &S,
    server: &Server,
    name: &str,
) -> SharedNetwork {
    let mut network = SharedNetwork::new(name);
    writer::create_shared_network(storage, server, &mut network)
        .await
        .expect("create shared network should succeed");
    network
}

/// The ID the next successful subnet creation must receive
pub async fn expected_next_subnet_id<S: ConfigStore + ?Sized>(storage: &S) -> SubnetId {
    let subnets = storage
        .list_subnets()
        .await
        .expect("list subnets should succeed");
    match subnets.last().and_then(|s| s.id) {
        Some(last) => last.next().expect("subnet id space should not be exhausted"),
        None => SubnetId::FIRST,
    }
}
