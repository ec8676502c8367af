//! Row mapping shared by the SQL backends
//!
//! Rows decode through `sqlx::FromRow` into flat structs that mirror the
//! Kea column layout, then convert into the domain types. The derives are
//! generic over the row type, so SQLite and MySQL share them.

use chrono::{DateTime, Utc};
use kea_config_common::{ipv4_to_u32, u32_to_ipv4};
use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::{Database, Encode, FromRow, Type};
use std::net::Ipv4Addr;

use crate::error::StorageError;
use crate::types::{
    AuditRevision, DdnsReplaceClientName, ParameterBlock, ReservationMode, RowCounts, Server,
    SharedNetwork, Subnet, SubnetId,
};

/// Parameter block columns, in bind order
///
/// [`bind_parameters`] binds values in exactly this order.
pub(crate) const PARAMETER_COLUMNS: [&str; 26] = [
    "boot_file_name",
    "next_server",
    "server_hostname",
    "client_class",
    "interface",
    "match_client_id",
    "relay",
    "require_client_classes",
    "reservation_mode",
    "authoritative",
    "valid_lifetime",
    "rebind_timer",
    "renew_timer",
    "calculate_tee_times",
    "t1_percent",
    "t2_percent",
    "min_valid_lifetime",
    "max_valid_lifetime",
    "ddns_send_updates",
    "ddns_override_no_update",
    "ddns_override_client_update",
    "ddns_replace_client_name",
    "ddns_generated_prefix",
    "ddns_qualifying_suffix",
    "user_context",
    "modification_ts",
];

/// Kea's JSON layout of the `relay` column
#[derive(Debug, Serialize, Deserialize)]
struct RelayJson {
    #[serde(rename = "ip-addresses")]
    ip_addresses: Vec<Ipv4Addr>,
}

/// Parameter block as stored: integers, flags and JSON text
#[derive(Debug, Clone, FromRow)]
pub(crate) struct ParameterColumns {
    pub boot_file_name: Option<String>,
    pub next_server: Option<i64>,
    pub server_hostname: Option<String>,
    pub client_class: Option<String>,
    pub interface: Option<String>,
    pub match_client_id: Option<bool>,
    pub relay: Option<String>,
    pub require_client_classes: Option<String>,
    pub reservation_mode: Option<i64>,
    pub authoritative: Option<bool>,
    pub valid_lifetime: Option<i64>,
    pub rebind_timer: Option<i64>,
    pub renew_timer: Option<i64>,
    pub calculate_tee_times: Option<bool>,
    pub t1_percent: Option<f32>,
    pub t2_percent: Option<f32>,
    pub min_valid_lifetime: Option<i64>,
    pub max_valid_lifetime: Option<i64>,
    pub ddns_send_updates: Option<bool>,
    pub ddns_override_no_update: Option<bool>,
    pub ddns_override_client_update: Option<bool>,
    pub ddns_replace_client_name: Option<i64>,
    pub ddns_generated_prefix: Option<String>,
    pub ddns_qualifying_suffix: Option<String>,
    pub user_context: Option<String>,
    #[sqlx(rename = "modification_ts")]
    pub modified_at: DateTime<Utc>,
}

fn to_json<T: Serialize>(column: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value)
        .map_err(|e| StorageError::InvalidData(format!("failed to serialize {}: {}", column, e)))
}

fn from_json<T: for<'de> Deserialize<'de>>(column: &str, text: &str) -> Result<T, StorageError> {
    serde_json::from_str(text)
        .map_err(|e| StorageError::InvalidData(format!("invalid {} JSON: {}", column, e)))
}

fn to_u32(column: &str, value: i64) -> Result<u32, StorageError> {
    u32::try_from(value)
        .map_err(|_| StorageError::InvalidData(format!("{} out of range: {}", column, value)))
}

fn to_u8(column: &str, value: i64) -> Result<u8, StorageError> {
    u8::try_from(value)
        .map_err(|_| StorageError::InvalidData(format!("{} out of range: {}", column, value)))
}

impl TryFrom<&ParameterBlock> for ParameterColumns {
    type Error = StorageError;

    fn try_from(block: &ParameterBlock) -> Result<Self, Self::Error> {
        Ok(Self {
            boot_file_name: block.boot_file_name.clone(),
            next_server: block.next_server.map(|addr| i64::from(ipv4_to_u32(addr))),
            server_hostname: block.server_hostname.clone(),
            client_class: block.client_class.clone(),
            interface: block.interface.clone(),
            match_client_id: block.match_client_id,
            relay: block
                .relay
                .as_ref()
                .map(|addrs| {
                    to_json(
                        "relay",
                        &RelayJson {
                            ip_addresses: addrs.clone(),
                        },
                    )
                })
                .transpose()?,
            require_client_classes: block
                .require_client_classes
                .as_ref()
                .map(|classes| to_json("require_client_classes", classes))
                .transpose()?,
            reservation_mode: block.reservation_mode.map(|m| i64::from(m.code())),
            authoritative: block.authoritative,
            valid_lifetime: block.valid_lifetime.map(i64::from),
            rebind_timer: block.rebind_timer.map(i64::from),
            renew_timer: block.renew_timer.map(i64::from),
            calculate_tee_times: block.calculate_tee_times,
            t1_percent: block.t1_percent,
            t2_percent: block.t2_percent,
            min_valid_lifetime: block.min_valid_lifetime.map(i64::from),
            max_valid_lifetime: block.max_valid_lifetime.map(i64::from),
            ddns_send_updates: block.ddns_send_updates,
            ddns_override_no_update: block.ddns_override_no_update,
            ddns_override_client_update: block.ddns_override_client_update,
            ddns_replace_client_name: block.ddns_replace_client_name.map(|p| i64::from(p.code())),
            ddns_generated_prefix: block.ddns_generated_prefix.clone(),
            ddns_qualifying_suffix: block.ddns_qualifying_suffix.clone(),
            user_context: block
                .user_context
                .as_ref()
                .map(|ctx| to_json("user_context", ctx))
                .transpose()?,
            modified_at: block.modified_at,
        })
    }
}

impl TryFrom<ParameterColumns> for ParameterBlock {
    type Error = StorageError;

    fn try_from(cols: ParameterColumns) -> Result<Self, Self::Error> {
        let opt_u32 = |column: &str, value: Option<i64>| value.map(|v| to_u32(column, v)).transpose();

        Ok(Self {
            boot_file_name: cols.boot_file_name,
            next_server: cols
                .next_server
                .map(|v| to_u32("next_server", v).map(u32_to_ipv4))
                .transpose()?,
            server_hostname: cols.server_hostname,
            client_class: cols.client_class,
            interface: cols.interface,
            match_client_id: cols.match_client_id,
            relay: cols
                .relay
                .as_deref()
                .map(|text| from_json::<RelayJson>("relay", text).map(|r| r.ip_addresses))
                .transpose()?,
            require_client_classes: cols
                .require_client_classes
                .as_deref()
                .map(|text| from_json("require_client_classes", text))
                .transpose()?,
            reservation_mode: cols
                .reservation_mode
                .map(|v| to_u8("reservation_mode", v).and_then(ReservationMode::try_from))
                .transpose()?,
            authoritative: cols.authoritative,
            valid_lifetime: opt_u32("valid_lifetime", cols.valid_lifetime)?,
            rebind_timer: opt_u32("rebind_timer", cols.rebind_timer)?,
            renew_timer: opt_u32("renew_timer", cols.renew_timer)?,
            calculate_tee_times: cols.calculate_tee_times,
            t1_percent: cols.t1_percent,
            t2_percent: cols.t2_percent,
            min_valid_lifetime: opt_u32("min_valid_lifetime", cols.min_valid_lifetime)?,
            max_valid_lifetime: opt_u32("max_valid_lifetime", cols.max_valid_lifetime)?,
            ddns_send_updates: cols.ddns_send_updates,
            ddns_override_no_update: cols.ddns_override_no_update,
            ddns_override_client_update: cols.ddns_override_client_update,
            ddns_replace_client_name: cols
                .ddns_replace_client_name
                .map(|v| {
                    to_u8("ddns_replace_client_name", v).and_then(DdnsReplaceClientName::try_from)
                })
                .transpose()?,
            ddns_generated_prefix: cols.ddns_generated_prefix,
            ddns_qualifying_suffix: cols.ddns_qualifying_suffix,
            user_context: cols
                .user_context
                .as_deref()
                .map(|text| from_json("user_context", text))
                .transpose()?,
            modified_at: cols.modified_at,
        })
    }
}

/// Bind every parameter column in [`PARAMETER_COLUMNS`] order
pub(crate) fn bind_parameters<'q, DB>(
    query: Query<'q, DB, <DB as Database>::Arguments<'q>>,
    cols: ParameterColumns,
) -> Query<'q, DB, <DB as Database>::Arguments<'q>>
where
    DB: Database,
    Option<String>: Encode<'q, DB> + Type<DB>,
    Option<i64>: Encode<'q, DB> + Type<DB>,
    Option<bool>: Encode<'q, DB> + Type<DB>,
    Option<f32>: Encode<'q, DB> + Type<DB>,
    DateTime<Utc>: Encode<'q, DB> + Type<DB>,
{
    query
        .bind(cols.boot_file_name)
        .bind(cols.next_server)
        .bind(cols.server_hostname)
        .bind(cols.client_class)
        .bind(cols.interface)
        .bind(cols.match_client_id)
        .bind(cols.relay)
        .bind(cols.require_client_classes)
        .bind(cols.reservation_mode)
        .bind(cols.authoritative)
        .bind(cols.valid_lifetime)
        .bind(cols.rebind_timer)
        .bind(cols.renew_timer)
        .bind(cols.calculate_tee_times)
        .bind(cols.t1_percent)
        .bind(cols.t2_percent)
        .bind(cols.min_valid_lifetime)
        .bind(cols.max_valid_lifetime)
        .bind(cols.ddns_send_updates)
        .bind(cols.ddns_override_no_update)
        .bind(cols.ddns_override_client_update)
        .bind(cols.ddns_replace_client_name)
        .bind(cols.ddns_generated_prefix)
        .bind(cols.ddns_qualifying_suffix)
        .bind(cols.user_context)
        .bind(cols.modified_at)
}

#[derive(Debug, FromRow)]
pub(crate) struct ServerRow {
    pub id: i64,
    pub tag: String,
    pub description: String,
    pub modification_ts: DateTime<Utc>,
}

impl From<ServerRow> for Server {
    fn from(row: ServerRow) -> Self {
        Self {
            id: row.id,
            tag: row.tag,
            description: row.description,
            modified_at: row.modification_ts,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct SharedNetworkRow {
    pub id: i64,
    pub name: String,
    #[sqlx(flatten)]
    pub parameters: ParameterColumns,
}

impl SharedNetworkRow {
    pub fn into_shared_network(self, servers: Vec<Server>) -> Result<SharedNetwork, StorageError> {
        Ok(SharedNetwork {
            id: self.id,
            name: self.name,
            parameters: self.parameters.try_into()?,
            servers,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct SubnetRow {
    pub subnet_id: i64,
    pub subnet_prefix: String,
    #[sqlx(rename = "4o6_interface")]
    pub v4o6_interface: Option<String>,
    #[sqlx(rename = "4o6_interface_id")]
    pub v4o6_interface_id: Option<String>,
    #[sqlx(rename = "4o6_subnet")]
    pub v4o6_subnet: Option<String>,
    pub shared_network_name: Option<String>,
    #[sqlx(flatten)]
    pub parameters: ParameterColumns,
}

impl SubnetRow {
    pub fn into_subnet(self, servers: Vec<Server>) -> Result<Subnet, StorageError> {
        Ok(Subnet {
            id: Some(SubnetId::try_from(self.subnet_id)?),
            prefix: self.subnet_prefix,
            v4o6_interface: self.v4o6_interface,
            v4o6_interface_id: self.v4o6_interface_id,
            v4o6_subnet: self.v4o6_subnet,
            shared_network_name: self.shared_network_name,
            parameters: self.parameters.try_into()?,
            servers,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct AuditRevisionRow {
    pub id: i64,
    pub modification_ts: DateTime<Utc>,
    pub server_tag: String,
    pub log_message: String,
    pub cascade_transaction: bool,
}

impl From<AuditRevisionRow> for AuditRevision {
    fn from(row: AuditRevisionRow) -> Self {
        Self {
            id: row.id,
            modified_at: row.modification_ts,
            server_tag: row.server_tag,
            message: row.log_message,
            affects_config: row.cascade_transaction,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct RowCountsRow {
    pub servers: i64,
    pub shared_networks: i64,
    pub shared_network_servers: i64,
    pub subnets: i64,
    pub subnet_servers: i64,
    pub audit_revisions: i64,
}

impl From<RowCountsRow> for RowCounts {
    fn from(row: RowCountsRow) -> Self {
        Self {
            servers: row.servers,
            shared_networks: row.shared_networks,
            shared_network_servers: row.shared_network_servers,
            subnets: row.subnets,
            subnet_servers: row.subnet_servers,
            audit_revisions: row.audit_revisions,
        }
    }
}
