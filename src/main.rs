//! Command line tool for inspecting vendor cluster definitions.
//!
//! Usage:
//!   vendor-clusters list
//!   vendor-clusters describe --cluster 0x130AFC01
//!   vendor-clusters decode --cluster 0x130AFC01 --attribute 0x130A0008 0a00006643
//!   vendor-clusters encode --cluster 0xFFF1FEDC --attribute 0x0000 4.5

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{debug, error, info};
use matter_vendor_clusters::codec::{encode_nullable, encode_value};
use matter_vendor_clusters::config::Config;
use matter_vendor_clusters::{
    AttributeReport, ClusterError, ClusterRegistry, ReportDecoder, Result,
};
use rs_matter::tlv::TLVElement;

#[derive(Parser)]
#[command(name = "vendor-clusters")]
#[command(about = "Inspect, decode and encode Matter vendor cluster attributes")]
struct Cli {
    /// JSON config file (defaults and environment variables apply otherwise)
    #[arg(long, env = "VENDOR_CLUSTERS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered clusters and their attributes
    List,
    /// Print cluster descriptors as JSON
    Describe {
        /// Only describe this cluster
        #[arg(long, value_parser = parse_id)]
        cluster: Option<u32>,
    },
    /// Decode a TLV encoded attribute value given as hex
    Decode {
        #[arg(long, value_parser = parse_id)]
        cluster: u32,

        #[arg(long, value_parser = parse_id)]
        attribute: u32,

        /// TLV bytes, hex encoded
        data: String,
    },
    /// Encode an attribute value to TLV hex (`null` clears it)
    Encode {
        #[arg(long, value_parser = parse_id)]
        cluster: u32,

        #[arg(long, value_parser = parse_id)]
        attribute: u32,

        value: String,
    },
}

/// Parse a cluster or attribute ID given as `0x` hex or decimal.
fn parse_id(text: &str) -> std::result::Result<u32, String> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => text.parse(),
    };

    parsed.map_err(|e| format!("invalid ID {text:?}: {e}"))
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env(),
    };
    debug!("Enabled clusters: {:?}", config.enabled_clusters);

    let registry = ClusterRegistry::from_config(&config)?;

    match cli.command {
        Commands::List => list(&registry),
        Commands::Describe { cluster } => describe(&registry, cluster)?,
        Commands::Decode {
            cluster,
            attribute,
            data,
        } => decode(&registry, cluster, attribute, &data)?,
        Commands::Encode {
            cluster,
            attribute,
            value,
        } => encode(&registry, &config, cluster, attribute, &value)?,
    }

    Ok(())
}

fn list(registry: &ClusterRegistry) {
    if registry.is_empty() {
        info!("No vendor clusters enabled");
        return;
    }

    for descriptor in registry.iter() {
        println!("{} (0x{:08X})", descriptor.name, descriptor.cluster_id);
        for field in descriptor.fields {
            let access = if field.writable { "rw" } else { "r" };
            println!(
                "  0x{:08X}  {:<28} {:<8} {}",
                field.attribute_id, field.label, field.wire_type, access
            );
        }
    }
}

fn describe(registry: &ClusterRegistry, cluster: Option<u32>) -> Result<()> {
    let json = match cluster {
        Some(id) => {
            let descriptor = registry
                .descriptor(id)
                .ok_or(ClusterError::UnknownCluster(id))?;
            serde_json::to_string_pretty(descriptor)?
        }
        None => serde_json::to_string_pretty(&registry.iter().collect::<Vec<_>>())?,
    };

    println!("{}", json);

    Ok(())
}

fn decode(registry: &ClusterRegistry, cluster: u32, attribute: u32, data: &str) -> Result<()> {
    let bytes = hex::decode(data.trim())
        .map_err(|e| ClusterError::InvalidValue(format!("invalid hex payload: {e}")))?;

    let report = AttributeReport::new(None, cluster, attribute, TLVElement::new(&bytes));
    let decoded = ReportDecoder::new(registry).decode(&report)?;

    println!("{}", serde_json::to_string_pretty(&decoded)?);

    Ok(())
}

fn encode(
    registry: &ClusterRegistry,
    config: &Config,
    cluster: u32,
    attribute: u32,
    value: &str,
) -> Result<()> {
    let field = registry.resolve(cluster, attribute)?;

    let bytes = if value.trim().eq_ignore_ascii_case("null") {
        encode_nullable(None, config.tlv_buffer_size)?
    } else {
        let value = field.wire_type.parse(value)?;
        encode_value(&value, config.tlv_buffer_size)?
    };

    debug!("Encoded {} as {} bytes", field.label, bytes.len());
    println!("{}", hex::encode(bytes));

    Ok(())
}
