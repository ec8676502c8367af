//! SQL statements shared by the SQLite and MySQL backends
//!
//! Both dialects accept `?` placeholders and backtick-quoted identifiers,
//! which the `4o6_*` columns need.

use std::sync::LazyLock;

use super::rows::PARAMETER_COLUMNS;

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

const SUBNET_OWN_COLUMNS: [&str; 6] = [
    "subnet_id",
    "subnet_prefix",
    "`4o6_interface`",
    "`4o6_interface_id`",
    "`4o6_subnet`",
    "shared_network_name",
];

pub(crate) const SELECT_SERVER_BY_TAG: &str = r#"
    SELECT id, tag, description, modification_ts
    FROM dhcp4_server
    WHERE tag = ?
"#;

pub(crate) const SELECT_ALL_SERVERS: &str = r#"
    SELECT id, tag, description, modification_ts
    FROM dhcp4_server
    ORDER BY tag
"#;

pub(crate) const INSERT_SERVER: &str = r#"
    INSERT INTO dhcp4_server (tag, description, modification_ts)
    VALUES (?, ?, ?)
"#;

pub(crate) const SELECT_SHARED_NETWORK_SERVERS: &str = r#"
    SELECT s.id, s.tag, s.description, s.modification_ts
    FROM dhcp4_server s
    INNER JOIN dhcp4_shared_network_server j ON j.server_id = s.id
    WHERE j.shared_network_id = ?
    ORDER BY s.tag
"#;

pub(crate) const SELECT_SUBNET_SERVERS: &str = r#"
    SELECT s.id, s.tag, s.description, s.modification_ts
    FROM dhcp4_server s
    INNER JOIN dhcp4_subnet_server j ON j.server_id = s.id
    WHERE j.subnet_id = ?
    ORDER BY s.tag
"#;

/// Association rows resolve the server by tag, so an unknown tag inserts nothing
pub(crate) const INSERT_SHARED_NETWORK_SERVER: &str = r#"
    INSERT INTO dhcp4_shared_network_server (shared_network_id, server_id, modification_ts)
    SELECT ?, id, ? FROM dhcp4_server WHERE tag = ?
"#;

pub(crate) const INSERT_SUBNET_SERVER: &str = r#"
    INSERT INTO dhcp4_subnet_server (subnet_id, server_id, modification_ts)
    SELECT ?, id, ? FROM dhcp4_server WHERE tag = ?
"#;

pub(crate) const SELECT_AUDIT_REVISIONS: &str = r#"
    SELECT id, modification_ts, server_tag, log_message, cascade_transaction
    FROM dhcp4_audit_revision
    ORDER BY id
"#;

pub(crate) const SELECT_ROW_COUNTS: &str = r#"
    SELECT
        (SELECT COUNT(*) FROM dhcp4_server) AS servers,
        (SELECT COUNT(*) FROM dhcp4_shared_network) AS shared_networks,
        (SELECT COUNT(*) FROM dhcp4_shared_network_server) AS shared_network_servers,
        (SELECT COUNT(*) FROM dhcp4_subnet) AS subnets,
        (SELECT COUNT(*) FROM dhcp4_subnet_server) AS subnet_servers,
        (SELECT COUNT(*) FROM dhcp4_audit_revision) AS audit_revisions
"#;

pub(crate) const SELECT_LAST_SUBNET_ID: &str =
    "SELECT subnet_id FROM dhcp4_subnet ORDER BY subnet_id DESC LIMIT 1";

/// `SELECT id, name, <parameters> FROM dhcp4_shared_network`
pub(crate) static SELECT_SHARED_NETWORKS: LazyLock<String> = LazyLock::new(|| {
    format!(
        "SELECT id, name, {} FROM dhcp4_shared_network",
        PARAMETER_COLUMNS.join(", ")
    )
});

pub(crate) static INSERT_SHARED_NETWORK: LazyLock<String> = LazyLock::new(|| {
    format!(
        "INSERT INTO dhcp4_shared_network (name, {}) VALUES (?, {})",
        PARAMETER_COLUMNS.join(", "),
        placeholders(PARAMETER_COLUMNS.len())
    )
});

/// `SELECT <subnet columns>, <parameters> FROM dhcp4_subnet`
pub(crate) static SELECT_SUBNETS: LazyLock<String> = LazyLock::new(|| {
    format!(
        "SELECT {}, {} FROM dhcp4_subnet",
        SUBNET_OWN_COLUMNS.join(", "),
        PARAMETER_COLUMNS.join(", ")
    )
});

pub(crate) static INSERT_SUBNET: LazyLock<String> = LazyLock::new(|| {
    format!(
        "INSERT INTO dhcp4_subnet ({}, {}) VALUES ({})",
        SUBNET_OWN_COLUMNS.join(", "),
        PARAMETER_COLUMNS.join(", "),
        placeholders(SUBNET_OWN_COLUMNS.len() + PARAMETER_COLUMNS.len())
    )
});
