//! IPv4 address formatting
//!
//! Kea keeps some addresses (e.g. `next_server`) as 32-bit unsigned integers
//! in network byte order. These helpers convert between that representation,
//! [`Ipv4Addr`] and the dotted-quad text form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::validation::{ValidationError, ValidationResult};

/// Convert a network-byte-order integer into an address
pub fn u32_to_ipv4(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(value.to_be_bytes())
}

/// Convert an address into its network-byte-order integer
pub fn ipv4_to_u32(addr: Ipv4Addr) -> u32 {
    u32::from_be_bytes(addr.octets())
}

/// Render a network-byte-order integer as a dotted quad, e.g. `10.83.27.254`
pub fn to_dotted_quad(value: u32) -> String {
    u32_to_ipv4(value).to_string()
}

/// Parse a dotted quad into its network-byte-order integer
pub fn from_dotted_quad(text: &str) -> ValidationResult<u32> {
    text.parse::<Ipv4Addr>()
        .map(ipv4_to_u32)
        .map_err(|_| ValidationError::InvalidIpv4Address(text.to_string()))
}

/// IPv4 CIDR prefix with host bits cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ipv4Prefix {
    network: Ipv4Addr,
    len: u8,
}

impl Ipv4Prefix {
    /// Build a prefix, rejecting lengths above 32 and set host bits
    pub fn new(network: Ipv4Addr, len: u8) -> ValidationResult<Self> {
        if len > 32 {
            return Err(ValidationError::InvalidPrefix(format!(
                "{}/{}: prefix length must be 0-32",
                network, len
            )));
        }

        if ipv4_to_u32(network) & !Self::mask_bits(len) != 0 {
            return Err(ValidationError::InvalidPrefix(format!(
                "{}/{}: host bits must be zero",
                network, len
            )));
        }

        Ok(Self { network, len })
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    /// Subnet mask for this prefix, e.g. `255.255.255.0` for /24
    pub fn netmask(&self) -> Ipv4Addr {
        u32_to_ipv4(Self::mask_bits(self.len))
    }

    /// Whether `addr` falls inside this prefix
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        ipv4_to_u32(addr) & Self::mask_bits(self.len) == ipv4_to_u32(self.network)
    }

    fn mask_bits(len: u8) -> u32 {
        // Shifting a u32 by 32 overflows
        match len {
            0 => 0,
            n => u32::MAX << (32 - u32::from(n)),
        }
    }
}

impl fmt::Display for Ipv4Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.len)
    }
}

impl FromStr for Ipv4Prefix {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, len) = s
            .split_once('/')
            .ok_or_else(|| ValidationError::InvalidPrefix(format!("{}: missing '/<len>'", s)))?;

        let network = addr
            .parse::<Ipv4Addr>()
            .map_err(|_| ValidationError::InvalidPrefix(format!("{}: bad network address", s)))?;

        let len = len
            .parse::<u8>()
            .map_err(|_| ValidationError::InvalidPrefix(format!("{}: bad prefix length", s)))?;

        Self::new(network, len)
    }
}

impl TryFrom<String> for Ipv4Prefix {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ipv4Prefix> for String {
    fn from(prefix: Ipv4Prefix) -> Self {
        prefix.to_string()
    }
}
