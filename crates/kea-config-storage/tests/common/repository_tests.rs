//! Entity Repository test suite
//!
//! Lookups by key, existence checks and the parameter block mapping.

use std::net::Ipv4Addr;

use kea_config_storage::{
    repository, writer, ConfigStore, DdnsReplaceClientName, ParameterBlock, ReservationMode,
    Server, SharedNetwork, Subnet, SubnetId,
};

use super::{create_network, ensure_server};

/// Run all repository tests
pub async fn run_all<S: ConfigStore>(storage: &S) {
    test_find_server_all(storage).await;
    test_find_shared_network(storage).await;
    test_find_subnet(storage).await;
    test_subnet_by_id(storage).await;
    test_exists_helpers(storage).await;
    test_parameter_block_persists(storage).await;
    test_unset_parameters_stay_unset(storage).await;
    test_listings_are_ordered(storage).await;
    test_lookups_are_exact(storage).await;
}

/// Test that `all` is missing until a server with that tag is created
pub async fn test_find_server_all<S: ConfigStore>(storage: &S) {
    let missing = repository::find_server(storage, "all")
        .await
        .expect("find_server should succeed");
    assert!(missing.is_none(), "no server is tagged 'all' yet");

    let mut server = Server::new("all", "every server");
    writer::create_server(storage, &mut server)
        .await
        .expect("create server should succeed");
    assert!(server.id > 0, "created server should carry its store id");

    let found = repository::find_server(storage, "all")
        .await
        .expect("find_server should succeed")
        .expect("server 'all' should exist");
    assert_eq!(found.id, server.id);
    assert_eq!(found.tag, "all");
    assert_eq!(found.description, "every server");
}

/// Test shared network lookup with its server associations
pub async fn test_find_shared_network<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "repo-server").await;

    assert!(repository::find_shared_network(storage, "repo-net")
        .await
        .expect("find_shared_network should succeed")
        .is_none());

    let created = create_network(storage, &server, "repo-net").await;

    let found = repository::find_shared_network(storage, "repo-net")
        .await
        .expect("find_shared_network should succeed")
        .expect("shared network should exist");
    assert_eq!(found.id, created.id);
    assert_eq!(found.name, "repo-net");
    assert_eq!(found.servers.len(), 1);
    assert_eq!(found.servers[0].tag, "repo-server");
}

/// Test subnet lookup by prefix
pub async fn test_find_subnet<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "repo-server").await;
    let network = repository::find_shared_network(storage, "repo-net")
        .await
        .expect("find_shared_network should succeed")
        .expect("shared network should exist");

    assert!(repository::find_subnet(storage, "172.16.0.0/16")
        .await
        .expect("find_subnet should succeed")
        .is_none());

    let mut subnet = Subnet::new("172.16.0.0/16");
    writer::create_subnet(storage, &server, &network, &mut subnet)
        .await
        .expect("create subnet should succeed");

    let found = repository::find_subnet(storage, "172.16.0.0/16")
        .await
        .expect("find_subnet should succeed")
        .expect("subnet should exist");
    assert_eq!(found.id, subnet.id);
    assert_eq!(found.shared_network_name.as_deref(), Some("repo-net"));
    assert_eq!(found.servers.len(), 1);
    assert_eq!(found.servers[0].tag, "repo-server");
}

/// Test subnet lookup by sequential ID
pub async fn test_subnet_by_id<S: ConfigStore>(storage: &S) {
    let by_prefix = repository::find_subnet(storage, "172.16.0.0/16")
        .await
        .expect("find_subnet should succeed")
        .expect("subnet should exist");
    let id = by_prefix.id.expect("stored subnet should have an id");

    let by_id = storage
        .subnet_by_id(id)
        .await
        .expect("subnet_by_id should succeed")
        .expect("subnet should exist");
    assert_eq!(by_id.prefix, "172.16.0.0/16");

    assert!(storage
        .subnet_by_id(SubnetId::new(u32::MAX))
        .await
        .expect("subnet_by_id should succeed")
        .is_none());
}

/// Test the existence helpers against created and missing keys
pub async fn test_exists_helpers<S: ConfigStore>(storage: &S) {
    assert!(repository::server_exists(storage, "repo-server")
        .await
        .expect("server_exists should succeed"));
    assert!(!repository::server_exists(storage, "never-created")
        .await
        .expect("server_exists should succeed"));

    assert!(repository::shared_network_exists(storage, "repo-net")
        .await
        .expect("shared_network_exists should succeed"));
    assert!(!repository::shared_network_exists(storage, "never-created")
        .await
        .expect("shared_network_exists should succeed"));

    assert!(repository::subnet_exists(storage, "172.16.0.0/16")
        .await
        .expect("subnet_exists should succeed"));
    assert!(!repository::subnet_exists(storage, "172.17.0.0/16")
        .await
        .expect("subnet_exists should succeed"));
}

/// Test that every kind of parameter survives a write and a read
pub async fn test_parameter_block_persists<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "repo-server").await;

    let parameters = ParameterBlock {
        boot_file_name: Some("pxelinux.0".into()),
        next_server: Some(Ipv4Addr::new(10, 83, 27, 254)),
        server_hostname: Some("tftp.example.org".into()),
        client_class: Some("voip".into()),
        interface: Some("eth1".into()),
        match_client_id: Some(false),
        relay: Some(vec![Ipv4Addr::new(10, 0, 0, 1)]),
        require_client_classes: Some(vec!["voip".into(), "phones".into()]),
        reservation_mode: Some(ReservationMode::Global),
        authoritative: Some(true),
        valid_lifetime: Some(7200),
        rebind_timer: Some(5400),
        renew_timer: Some(3600),
        calculate_tee_times: Some(true),
        t1_percent: Some(0.5),
        t2_percent: Some(0.875),
        min_valid_lifetime: Some(3600),
        max_valid_lifetime: Some(86400),
        ddns_send_updates: Some(true),
        ddns_override_no_update: Some(false),
        ddns_override_client_update: Some(true),
        ddns_replace_client_name: Some(DdnsReplaceClientName::Always),
        ddns_generated_prefix: Some("host".into()),
        ddns_qualifying_suffix: Some("example.org".into()),
        user_context: Some(serde_json::json!({"site": "hq", "rack": 4})),
        ..ParameterBlock::default()
    };

    let mut network = SharedNetwork::new("repo-params");
    network.parameters = parameters.clone();
    writer::create_shared_network(storage, &server, &mut network)
        .await
        .expect("create shared network should succeed");

    let mut subnet = Subnet::new("192.168.100.0/24");
    subnet.parameters = parameters.clone();
    subnet.v4o6_interface = Some("eth0".into());
    subnet.v4o6_interface_id = Some("relay-1".into());
    subnet.v4o6_subnet = Some("2001:db8::/64".into());
    writer::create_subnet(storage, &server, &network, &mut subnet)
        .await
        .expect("create subnet should succeed");

    // Timestamp precision differs per backend
    let comparable = |mut block: ParameterBlock| {
        block.modified_at = parameters.modified_at;
        block
    };

    let stored_network = repository::find_shared_network(storage, "repo-params")
        .await
        .expect("find_shared_network should succeed")
        .expect("shared network should exist");
    assert_eq!(comparable(stored_network.parameters), parameters);

    let stored_subnet = repository::find_subnet(storage, "192.168.100.0/24")
        .await
        .expect("find_subnet should succeed")
        .expect("subnet should exist");
    assert_eq!(comparable(stored_subnet.parameters), parameters);
    assert_eq!(stored_subnet.v4o6_interface.as_deref(), Some("eth0"));
    assert_eq!(stored_subnet.v4o6_interface_id.as_deref(), Some("relay-1"));
    assert_eq!(stored_subnet.v4o6_subnet.as_deref(), Some("2001:db8::/64"));
}

/// Test that unset parameters read back as unset, not as zero values
pub async fn test_unset_parameters_stay_unset<S: ConfigStore>(storage: &S) {
    let server = ensure_server(storage, "repo-server").await;

    let mut subnet = Subnet::new("192.168.101.0/24");
    writer::create_unassigned_subnet(storage, &server, &mut subnet)
        .await
        .expect("create subnet should succeed");

    let stored = repository::find_subnet(storage, "192.168.101.0/24")
        .await
        .expect("find_subnet should succeed")
        .expect("subnet should exist");
    let expected = ParameterBlock {
        modified_at: stored.parameters.modified_at,
        ..ParameterBlock::default()
    };
    assert_eq!(stored.parameters, expected);
    assert!(stored.shared_network_name.is_none());
    assert!(stored.v4o6_interface.is_none());
}

/// Test listing order of servers, networks and subnets
pub async fn test_listings_are_ordered<S: ConfigStore>(storage: &S) {
    let servers = storage
        .list_servers()
        .await
        .expect("list servers should succeed");
    let tags: Vec<&str> = servers.iter().map(|s| s.tag.as_str()).collect();
    let mut sorted = tags.clone();
    sorted.sort_unstable();
    assert_eq!(tags, sorted);

    let networks = storage
        .list_shared_networks()
        .await
        .expect("list shared networks should succeed");
    let names: Vec<&str> = networks.iter().map(|n| n.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    assert!(networks.iter().all(|n| !n.servers.is_empty()));

    let subnets = storage
        .list_subnets()
        .await
        .expect("list subnets should succeed");
    assert!(subnets.windows(2).all(|pair| pair[0].id < pair[1].id));
}

/// Test that lookups match the whole key only
pub async fn test_lookups_are_exact<S: ConfigStore>(storage: &S) {
    for tag in ["al", "all%", "%"] {
        assert!(
            repository::find_server(storage, tag)
                .await
                .expect("find_server should succeed")
                .is_none(),
            "tag {:?} should not match",
            tag
        );
    }

    assert!(repository::find_shared_network(storage, "repo-")
        .await
        .expect("find_shared_network should succeed")
        .is_none());
    assert!(repository::find_subnet(storage, "172.16.0.0")
        .await
        .expect("find_subnet should succeed")
        .is_none());
}
