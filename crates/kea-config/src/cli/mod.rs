//! Command-line client for the Kea configuration store.
//!
//! Each invocation opens the store named by the database URL, applies the
//! schema if needed, runs one command and exits. Configuration is loaded
//! from CLI args, environment variables, or config file with precedence
//! CLI > env > file.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use config::CliConfig;
pub use error::{describe, EXIT_ERROR, EXIT_USAGE};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use kea_config_storage::{
    create_storage, ConfigStore, DdnsReplaceClientName, ParameterBlock, ReservationMode,
    StorageConfig,
};
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::tracing_setup;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "kea-config")]
#[command(about = "Kea DHCPv4 configuration store CLI", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database URL (sqlite://... or mysql://...)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the schema and check the database
    Init,
    /// Manage servers
    Server(ServerArgs),
    /// Manage shared networks
    SharedNetwork(SharedNetworkArgs),
    /// Manage subnets
    Subnet(SubnetArgs),
    /// Inspect the audit trail
    Audit(AuditArgs),
    /// Convert between dotted-quad and integer addresses
    Address(AddressArgs),
    /// Show effective configuration
    Config,
}

#[derive(Args)]
pub struct ServerArgs {
    #[command(subcommand)]
    pub command: ServerCommand,
}

#[derive(Subcommand)]
pub enum ServerCommand {
    /// Add a new server
    Add {
        /// Server tag
        tag: String,
        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show a server by tag
    Show {
        tag: String,
    },
    /// List all servers
    List,
}

#[derive(Args)]
pub struct SharedNetworkArgs {
    #[command(subcommand)]
    pub command: SharedNetworkCommand,
}

#[derive(Subcommand)]
pub enum SharedNetworkCommand {
    /// Add a new shared network
    Add {
        /// Shared network name
        name: String,
        /// Tag of the server the network is assigned to
        #[arg(long, default_value = "all")]
        server: String,
        #[command(flatten)]
        params: ParameterArgs,
    },
    /// Show a shared network by name
    Show {
        name: String,
    },
    /// List all shared networks
    List,
}

#[derive(Args)]
pub struct SubnetArgs {
    #[command(subcommand)]
    pub command: SubnetCommand,
}

#[derive(Subcommand)]
pub enum SubnetCommand {
    /// Add a new subnet; its ID is allocated automatically
    Add {
        /// Subnet prefix in CIDR notation, e.g. 10.83.27.0/24
        prefix: String,
        /// Shared network the subnet belongs to
        #[arg(long)]
        shared_network: Option<String>,
        /// Tag of the server the subnet is assigned to
        #[arg(long, default_value = "all")]
        server: String,
        /// DHCPv4-over-DHCPv6 interface
        #[arg(long = "4o6-interface")]
        v4o6_interface: Option<String>,
        /// DHCPv4-over-DHCPv6 interface ID
        #[arg(long = "4o6-interface-id")]
        v4o6_interface_id: Option<String>,
        /// DHCPv4-over-DHCPv6 IPv6 subnet
        #[arg(long = "4o6-subnet")]
        v4o6_subnet: Option<String>,
        #[command(flatten)]
        params: ParameterArgs,
    },
    /// Show a subnet by prefix or ID
    Show {
        #[arg(required_unless_present = "id")]
        prefix: Option<String>,
        #[arg(long, conflicts_with = "prefix")]
        id: Option<u32>,
    },
    /// List all subnets ordered by ID
    List,
}

#[derive(Args)]
pub struct AuditArgs {
    #[command(subcommand)]
    pub command: AuditCommand,
}

#[derive(Subcommand)]
pub enum AuditCommand {
    /// List audit revisions, oldest first
    List {
        /// Only show the most recent N revisions
        #[arg(long)]
        last: Option<usize>,
    },
}

#[derive(Args)]
pub struct AddressArgs {
    #[command(subcommand)]
    pub command: AddressCommand,
}

#[derive(Subcommand)]
pub enum AddressCommand {
    /// Render a network-byte-order integer as a dotted quad
    ToDotted { value: u32 },
    /// Parse a dotted quad into its network-byte-order integer
    ToInt { address: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReservationModeArg {
    Disabled,
    OutOfPool,
    Global,
    All,
}

impl From<ReservationModeArg> for ReservationMode {
    fn from(arg: ReservationModeArg) -> Self {
        match arg {
            ReservationModeArg::Disabled => ReservationMode::Disabled,
            ReservationModeArg::OutOfPool => ReservationMode::OutOfPool,
            ReservationModeArg::Global => ReservationMode::Global,
            ReservationModeArg::All => ReservationMode::All,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReplaceClientNameArg {
    Never,
    Always,
    WhenPresent,
    WhenNotPresent,
}

impl From<ReplaceClientNameArg> for DdnsReplaceClientName {
    fn from(arg: ReplaceClientNameArg) -> Self {
        match arg {
            ReplaceClientNameArg::Never => DdnsReplaceClientName::Never,
            ReplaceClientNameArg::Always => DdnsReplaceClientName::Always,
            ReplaceClientNameArg::WhenPresent => DdnsReplaceClientName::WhenPresent,
            ReplaceClientNameArg::WhenNotPresent => DdnsReplaceClientName::WhenNotPresent,
        }
    }
}

fn parse_json(value: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(value).map_err(|e| format!("invalid JSON: {}", e))
}

/// DHCP parameters settable on shared networks and subnets
///
/// Anything left unset is inherited from a higher configuration scope.
#[derive(Args, Debug, Default)]
pub struct ParameterArgs {
    /// Valid lifetime in seconds
    #[arg(long)]
    pub valid_lifetime: Option<u32>,
    #[arg(long)]
    pub min_valid_lifetime: Option<u32>,
    #[arg(long)]
    pub max_valid_lifetime: Option<u32>,
    /// T1 in seconds
    #[arg(long)]
    pub renew_timer: Option<u32>,
    /// T2 in seconds
    #[arg(long)]
    pub rebind_timer: Option<u32>,
    #[arg(long)]
    pub calculate_tee_times: Option<bool>,
    #[arg(long)]
    pub t1_percent: Option<f32>,
    #[arg(long)]
    pub t2_percent: Option<f32>,
    /// Next server address (siaddr)
    #[arg(long)]
    pub next_server: Option<Ipv4Addr>,
    #[arg(long)]
    pub boot_file_name: Option<String>,
    #[arg(long)]
    pub server_hostname: Option<String>,
    #[arg(long)]
    pub client_class: Option<String>,
    /// Client classes a client must belong to (repeatable)
    #[arg(long = "require-client-class")]
    pub require_client_classes: Vec<String>,
    #[arg(long)]
    pub interface: Option<String>,
    #[arg(long)]
    pub match_client_id: Option<bool>,
    #[arg(long)]
    pub authoritative: Option<bool>,
    /// Relay agent address (repeatable)
    #[arg(long = "relay")]
    pub relay: Vec<Ipv4Addr>,
    #[arg(long, value_enum)]
    pub reservation_mode: Option<ReservationModeArg>,
    #[arg(long)]
    pub ddns_send_updates: Option<bool>,
    #[arg(long)]
    pub ddns_override_no_update: Option<bool>,
    #[arg(long)]
    pub ddns_override_client_update: Option<bool>,
    #[arg(long, value_enum)]
    pub ddns_replace_client_name: Option<ReplaceClientNameArg>,
    #[arg(long)]
    pub ddns_generated_prefix: Option<String>,
    #[arg(long)]
    pub ddns_qualifying_suffix: Option<String>,
    /// Arbitrary JSON attached to the entity
    #[arg(long, value_parser = parse_json)]
    pub user_context: Option<serde_json::Value>,
}

impl ParameterArgs {
    /// Build a parameter block stamped with the current time
    pub fn into_block(self) -> ParameterBlock {
        ParameterBlock {
            boot_file_name: self.boot_file_name,
            next_server: self.next_server,
            server_hostname: self.server_hostname,
            client_class: self.client_class,
            interface: self.interface,
            match_client_id: self.match_client_id,
            relay: (!self.relay.is_empty()).then_some(self.relay),
            require_client_classes: (!self.require_client_classes.is_empty())
                .then_some(self.require_client_classes),
            reservation_mode: self.reservation_mode.map(Into::into),
            authoritative: self.authoritative,
            valid_lifetime: self.valid_lifetime,
            rebind_timer: self.rebind_timer,
            renew_timer: self.renew_timer,
            calculate_tee_times: self.calculate_tee_times,
            t1_percent: self.t1_percent,
            t2_percent: self.t2_percent,
            min_valid_lifetime: self.min_valid_lifetime,
            max_valid_lifetime: self.max_valid_lifetime,
            ddns_send_updates: self.ddns_send_updates,
            ddns_override_no_update: self.ddns_override_no_update,
            ddns_override_client_update: self.ddns_override_client_update,
            ddns_replace_client_name: self.ddns_replace_client_name.map(Into::into),
            ddns_generated_prefix: self.ddns_generated_prefix,
            ddns_qualifying_suffix: self.ddns_qualifying_suffix,
            user_context: self.user_context,
            ..ParameterBlock::default()
        }
    }
}

/// Run one command against an open store
pub async fn execute(
    store: &dyn ConfigStore,
    command: Commands,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        Commands::Init => commands::init::handle(store, quiet).await,
        Commands::Server(args) => {
            commands::server::handle(store, args.command, format, quiet).await
        }
        Commands::SharedNetwork(args) => {
            commands::shared_network::handle(store, args.command, format, quiet).await
        }
        Commands::Subnet(args) => {
            commands::subnet::handle(store, args.command, format, quiet).await
        }
        Commands::Audit(args) => commands::audit::handle(store, args.command, format).await,
        Commands::Address(args) => commands::address::handle(args.command, format),
        Commands::Config => Ok(()),
    }
}

fn failure(err: &anyhow::Error) -> ExitCode {
    let (message, code) = describe(err);
    eprintln!("{}", message);
    ExitCode::from(code as u8)
}

pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Address conversion needs neither config nor database
    if let Commands::Address(args) = cli.command {
        return Ok(match commands::address::handle(args.command, cli.format) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => failure(&e),
        });
    }

    let config = match CliConfig::load(cli.config.as_ref(), cli.database_url.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return Ok(ExitCode::from(EXIT_USAGE as u8));
        }
    };

    let storage_config = match StorageConfig::from_url(&config.database_url) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Ok(ExitCode::from(EXIT_USAGE as u8));
        }
    };

    if matches!(cli.command, Commands::Config) {
        println!("Database: {}", storage_config.redacted());
        println!(
            "Log filter: {}",
            config
                .log_filter
                .as_deref()
                .unwrap_or(tracing_setup::DEFAULT_FILTER)
        );
        return Ok(ExitCode::SUCCESS);
    }

    tracing_setup::init(config.log_filter.as_deref());

    let store = match create_storage(&storage_config).await {
        Ok(s) => s,
        Err(e) => return Ok(failure(&e.into())),
    };

    let result = execute(store.as_ref(), cli.command, cli.format, cli.quiet).await;
    if let Err(e) = store.close().await {
        tracing::warn!(error = %e, "failed to close configuration store");
    }

    Ok(match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => failure(&e),
    })
}
