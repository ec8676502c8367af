pub mod address;
pub mod validation;

pub use address::{from_dotted_quad, ipv4_to_u32, to_dotted_quad, u32_to_ipv4, Ipv4Prefix};
pub use validation::{
    validate_server_tag, validate_shared_network_name, validate_subnet_prefix, ValidationError,
    ValidationResult,
};
