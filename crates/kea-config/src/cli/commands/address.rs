use anyhow::Result;
use kea_config_common::{from_dotted_quad, to_dotted_quad};
use serde::Serialize;

use crate::cli::{
    output::{print_item, TableDisplay},
    AddressCommand, OutputFormat,
};

/// Both representations of one IPv4 address
#[derive(Debug, PartialEq, Serialize)]
pub struct AddressConversion {
    pub integer: u32,
    pub dotted: String,
}

impl TableDisplay for AddressConversion {
    fn headers() -> Vec<&'static str> {
        vec!["INTEGER", "ADDRESS"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.integer.to_string(), self.dotted.clone()]
    }
}

pub fn convert(command: AddressCommand) -> Result<AddressConversion> {
    let conversion = match command {
        AddressCommand::ToDotted { value } => AddressConversion {
            integer: value,
            dotted: to_dotted_quad(value),
        },
        AddressCommand::ToInt { address } => {
            let integer = from_dotted_quad(&address)?;
            AddressConversion {
                integer,
                dotted: to_dotted_quad(integer),
            }
        }
    };
    Ok(conversion)
}

pub fn handle(command: AddressCommand, format: OutputFormat) -> Result<()> {
    let conversion = convert(command)?;
    print_item(&conversion, format);
    Ok(())
}
