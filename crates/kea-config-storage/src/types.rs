//! Domain types for storage layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

use crate::error::StorageError;

/// Sequential subnet identifier
///
/// Subnet IDs are allocated by the writer, never by the store: the first
/// subnet gets [`SubnetId::FIRST`], every later one the current maximum + 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubnetId(u32);

impl SubnetId {
    pub const FIRST: SubnetId = SubnetId(1);

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// The identifier following this one, or `None` when the space is exhausted
    pub fn next(&self) -> Option<SubnetId> {
        self.0.checked_add(1).map(SubnetId)
    }
}

impl fmt::Display for SubnetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SubnetId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl TryFrom<i64> for SubnetId {
    type Error = StorageError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(SubnetId)
            .map_err(|_| StorageError::InvalidData(format!("subnet_id out of range: {}", value)))
    }
}

/// A Kea server identity
///
/// Referenced, never owned, by shared networks and subnets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// Store-assigned identifier (0 until persisted)
    pub id: i64,
    pub tag: String,
    pub description: String,
    pub modified_at: DateTime<Utc>,
}

impl Server {
    pub fn new(tag: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            tag: tag.into(),
            description: description.into(),
            modified_at: Utc::now(),
        }
    }

    /// A row that scanned without a tag is treated as absent
    pub fn is_zero(&self) -> bool {
        self.tag.is_empty()
    }
}

/// Kea host reservation mode (`reservation_mode` column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReservationMode {
    Disabled,
    OutOfPool,
    Global,
    All,
}

impl ReservationMode {
    pub fn code(&self) -> u8 {
        match self {
            ReservationMode::Disabled => 0,
            ReservationMode::OutOfPool => 1,
            ReservationMode::Global => 2,
            ReservationMode::All => 3,
        }
    }
}

impl TryFrom<u8> for ReservationMode {
    type Error = StorageError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ReservationMode::Disabled),
            1 => Ok(ReservationMode::OutOfPool),
            2 => Ok(ReservationMode::Global),
            3 => Ok(ReservationMode::All),
            other => Err(StorageError::InvalidData(format!(
                "unknown reservation_mode code: {}",
                other
            ))),
        }
    }
}

/// Kea `ddns-replace-client-name` policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DdnsReplaceClientName {
    Never,
    Always,
    WhenPresent,
    WhenNotPresent,
}

impl DdnsReplaceClientName {
    pub fn code(&self) -> u8 {
        match self {
            DdnsReplaceClientName::Never => 0,
            DdnsReplaceClientName::Always => 1,
            DdnsReplaceClientName::WhenPresent => 2,
            DdnsReplaceClientName::WhenNotPresent => 3,
        }
    }
}

impl TryFrom<u8> for DdnsReplaceClientName {
    type Error = StorageError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(DdnsReplaceClientName::Never),
            1 => Ok(DdnsReplaceClientName::Always),
            2 => Ok(DdnsReplaceClientName::WhenPresent),
            3 => Ok(DdnsReplaceClientName::WhenNotPresent),
            other => Err(StorageError::InvalidData(format!(
                "unknown ddns_replace_client_name code: {}",
                other
            ))),
        }
    }
}

/// DHCPv4 tuning values shared by shared networks and subnets
///
/// Every field except `modified_at` is optional. `None` means the value is
/// inherited from a higher configuration scope; the DHCP server resolves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterBlock {
    pub boot_file_name: Option<String>,
    pub next_server: Option<Ipv4Addr>,
    pub server_hostname: Option<String>,
    pub client_class: Option<String>,
    pub interface: Option<String>,
    pub match_client_id: Option<bool>,
    /// Relay agent addresses
    pub relay: Option<Vec<Ipv4Addr>>,
    pub require_client_classes: Option<Vec<String>>,
    pub reservation_mode: Option<ReservationMode>,
    pub authoritative: Option<bool>,
    pub valid_lifetime: Option<u32>,
    pub rebind_timer: Option<u32>,
    pub renew_timer: Option<u32>,
    pub calculate_tee_times: Option<bool>,
    pub t1_percent: Option<f32>,
    pub t2_percent: Option<f32>,
    pub min_valid_lifetime: Option<u32>,
    pub max_valid_lifetime: Option<u32>,
    pub ddns_send_updates: Option<bool>,
    pub ddns_override_no_update: Option<bool>,
    pub ddns_override_client_update: Option<bool>,
    pub ddns_replace_client_name: Option<DdnsReplaceClientName>,
    pub ddns_generated_prefix: Option<String>,
    pub ddns_qualifying_suffix: Option<String>,
    pub user_context: Option<serde_json::Value>,
    pub modified_at: DateTime<Utc>,
}

impl Default for ParameterBlock {
    fn default() -> Self {
        Self {
            boot_file_name: None,
            next_server: None,
            server_hostname: None,
            client_class: None,
            interface: None,
            match_client_id: None,
            relay: None,
            require_client_classes: None,
            reservation_mode: None,
            authoritative: None,
            valid_lifetime: None,
            rebind_timer: None,
            renew_timer: None,
            calculate_tee_times: None,
            t1_percent: None,
            t2_percent: None,
            min_valid_lifetime: None,
            max_valid_lifetime: None,
            ddns_send_updates: None,
            ddns_override_no_update: None,
            ddns_override_client_update: None,
            ddns_replace_client_name: None,
            ddns_generated_prefix: None,
            ddns_qualifying_suffix: None,
            user_context: None,
            modified_at: Utc::now(),
        }
    }
}

/// Push `server` onto an association set unless a server with its tag is there
pub(crate) fn associate(servers: &mut Vec<Server>, server: &Server) {
    if !servers.iter().any(|s| s.tag == server.tag) {
        servers.push(server.clone());
    }
}

/// Named grouping of subnets sharing one broadcast domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedNetwork {
    /// Store-assigned identifier (0 until persisted)
    pub id: i64,
    pub name: String,
    pub parameters: ParameterBlock,
    /// Servers this network is assigned to
    pub servers: Vec<Server>,
}

impl SharedNetwork {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            parameters: ParameterBlock::default(),
            servers: Vec::new(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.name.is_empty()
    }

    /// Assign this network to `server`; repeated assignment is a no-op
    pub fn add_server(&mut self, server: &Server) {
        associate(&mut self.servers, server);
    }
}

/// DHCPv4 subnet identified by its CIDR prefix and sequential ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subnet {
    /// `None` until the writer allocates an ID; set only after the create
    /// commits, and always `Some` on subnets read back from the store
    pub id: Option<SubnetId>,
    pub prefix: String,
    pub v4o6_interface: Option<String>,
    pub v4o6_interface_id: Option<String>,
    pub v4o6_subnet: Option<String>,
    pub shared_network_name: Option<String>,
    pub parameters: ParameterBlock,
    /// Servers this subnet is assigned to
    pub servers: Vec<Server>,
}

impl Subnet {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            id: None,
            prefix: prefix.into(),
            v4o6_interface: None,
            v4o6_interface_id: None,
            v4o6_subnet: None,
            shared_network_name: None,
            parameters: ParameterBlock::default(),
            servers: Vec::new(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Assign this subnet to `server`; repeated assignment is a no-op
    pub fn add_server(&mut self, server: &Server) {
        associate(&mut self.servers, server);
    }
}

/// Append-only audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRevision {
    pub id: i64,
    pub modified_at: DateTime<Utc>,
    /// Tag of the server that performed the change
    pub server_tag: String,
    pub message: String,
    /// Always true for revisions written by this crate
    pub affects_config: bool,
}

/// Row counts of every table the writer touches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowCounts {
    pub servers: i64,
    pub shared_networks: i64,
    pub shared_network_servers: i64,
    pub subnets: i64,
    pub subnet_servers: i64,
    pub audit_revisions: i64,
}
