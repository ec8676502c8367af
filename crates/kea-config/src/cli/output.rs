use kea_config_storage::{AuditRevision, Server, SharedNetwork, Subnet};
use serde::Serialize;

use super::OutputFormat;

/// Trait for types that can be displayed in table format
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

fn server_tags(servers: &[Server]) -> String {
    servers
        .iter()
        .map(|s| s.tag.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl TableDisplay for Server {
    fn headers() -> Vec<&'static str> {
        vec!["TAG", "DESCRIPTION", "MODIFIED"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.tag.clone(),
            self.description.clone(),
            self.modified_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

impl TableDisplay for SharedNetwork {
    fn headers() -> Vec<&'static str> {
        vec!["NAME", "VALID-LIFETIME", "INTERFACE", "SERVERS"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            optional(self.parameters.valid_lifetime),
            self.parameters.interface.clone().unwrap_or_default(),
            server_tags(&self.servers),
        ]
    }
}

impl TableDisplay for Subnet {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "PREFIX", "SHARED-NETWORK", "NEXT-SERVER", "SERVERS"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            optional(self.id),
            self.prefix.clone(),
            self.shared_network_name.clone().unwrap_or_default(),
            optional(self.parameters.next_server),
            server_tags(&self.servers),
        ]
    }
}

impl TableDisplay for AuditRevision {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "TIME", "SERVER", "MESSAGE"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.modified_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.server_tag.clone(),
            self.message.clone(),
        ]
    }
}

/// Print items in the specified format
pub fn print_items<T>(items: &[T], format: OutputFormat)
where
    T: TableDisplay + Serialize,
{
    match format {
        OutputFormat::Table => print!("{}", render_table(items)),
        OutputFormat::Json => print_json(items),
    }
}

/// Print a single item
pub fn print_item<T>(item: &T, format: OutputFormat)
where
    T: TableDisplay + Serialize,
{
    match format {
        OutputFormat::Table => print!("{}", render_table(std::slice::from_ref(item))),
        OutputFormat::Json => print_json(item),
    }
}

/// Render rows under their headers, columns padded to the widest cell
pub fn render_table<T: TableDisplay>(items: &[T]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let headers = T::headers();
    let rows: Vec<Vec<String>> = items.iter().map(|i| i.row()).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let format_line = |cells: Vec<String>| -> String {
        let line: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let width = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = width)
            })
            .collect();
        format!("{}\n", line.join("  ").trim_end())
    };

    let mut out = format_line(headers.iter().map(|h| h.to_string()).collect());
    for row in rows {
        out.push_str(&format_line(row));
    }
    out
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing to JSON: {}", e),
    }
}
