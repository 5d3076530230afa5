//! CLI argument definitions using clap
//!
//! Commands:
//! - meshfield encode --store <path> --entity <kind> --id <n> --name <s> --types <t,..>
//! - meshfield inspect --store <path> --entity <kind> --id <n> [--name <s>]
//! - meshfield types

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::field::{EntityType, FieldType};

/// meshfield - field metadata for mesh attribute stores
#[derive(Parser, Debug)]
#[command(name = "meshfield")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a field on a mesh entity
    Encode(EncodeArgs),

    /// Print the fields registered on a mesh entity
    Inspect(InspectArgs),

    /// List the known field types and their tags
    Types,
}

#[derive(Args, Debug, Clone)]
pub struct EncodeArgs {
    /// Attribute store file (created if missing)
    #[arg(long)]
    pub store: PathBuf,

    /// Owning entity kind, e.g. edge-block
    #[arg(long)]
    pub entity: EntityType,

    /// Owning entity id
    #[arg(long, allow_negative_numbers = true)]
    pub id: i64,

    /// Field name
    #[arg(long)]
    pub name: String,

    /// One type per nesting level, e.g. sym_tensor_33,sequence
    #[arg(long, value_delimiter = ',', required = true)]
    pub types: Vec<FieldType>,

    /// Cardinality per level; zeros when omitted
    #[arg(long, value_delimiter = ',')]
    pub cardinality: Vec<i64>,

    /// Separator characters: none, one for every level, or one per level
    #[arg(long, default_value = "")]
    pub separators: String,

    /// Comma-separated component suffixes of a user-defined field
    #[arg(long)]
    pub suffices: Option<String>,

    /// Encoder configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Attribute store file
    #[arg(long)]
    pub store: PathBuf,

    /// Owning entity kind, e.g. edge-block
    #[arg(long)]
    pub entity: EntityType,

    /// Owning entity id
    #[arg(long, allow_negative_numbers = true)]
    pub id: i64,

    /// Only this field; all fields on the entity when omitted
    #[arg(long)]
    pub name: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
