use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::address::Ipv4Prefix;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid IPv4 address: {0}")]
    InvalidIpv4Address(String),

    #[error("Invalid subnet prefix: {0}")]
    InvalidPrefix(String),

    #[error("Invalid server tag: {0}")]
    InvalidServerTag(String),

    #[error("Invalid shared network name: {0}")]
    InvalidSharedNetworkName(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Kea stores server tags in a VARCHAR(64) column
pub const MAX_SERVER_TAG_LEN: usize = 64;

/// Kea stores shared network names in a VARCHAR(128) column
pub const MAX_SHARED_NETWORK_NAME_LEN: usize = 128;

// Identifier: starts alphanumeric, then alphanumerics, dots, dashes, underscores
static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap());

/// Validates a server tag such as `all` or `dhcp-east-1`
pub fn validate_server_tag(tag: &str) -> ValidationResult<&str> {
    if tag.is_empty() {
        return Err(ValidationError::InvalidServerTag(
            "server tag cannot be empty".to_string(),
        ));
    }

    if tag.len() > MAX_SERVER_TAG_LEN {
        return Err(ValidationError::InvalidServerTag(format!(
            "server tag exceeds maximum length of {} characters",
            MAX_SERVER_TAG_LEN
        )));
    }

    if !IDENTIFIER_REGEX.is_match(tag) {
        return Err(ValidationError::InvalidServerTag(format!(
            "'{}' contains characters outside [A-Za-z0-9._-]",
            tag
        )));
    }

    Ok(tag)
}

/// Validates a shared network name
///
/// Rules:
/// - 1-128 characters
/// - Starts with an alphanumeric character
/// - Remaining characters are alphanumerics, dots, dashes or underscores
pub fn validate_shared_network_name(name: &str) -> ValidationResult<&str> {
    if name.is_empty() {
        return Err(ValidationError::InvalidSharedNetworkName(
            "shared network name cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_SHARED_NETWORK_NAME_LEN {
        return Err(ValidationError::InvalidSharedNetworkName(format!(
            "shared network name exceeds maximum length of {} characters",
            MAX_SHARED_NETWORK_NAME_LEN
        )));
    }

    if !IDENTIFIER_REGEX.is_match(name) {
        return Err(ValidationError::InvalidSharedNetworkName(format!(
            "'{}' contains characters outside [A-Za-z0-9._-]",
            name
        )));
    }

    Ok(name)
}

/// Validates a CIDR subnet prefix such as `192.168.101.0/24`
///
/// Host bits must be zero. Overlap with other subnets is not checked.
pub fn validate_subnet_prefix(prefix: &str) -> ValidationResult<Ipv4Prefix> {
    prefix.parse::<Ipv4Prefix>()
}
