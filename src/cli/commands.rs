//! CLI command implementations
//!
//! Commands build their JSON result and hand it to `run_command`, which prints
//! it. Failures propagate as `CliError`.

use serde_json::{json, Value};

use crate::attribute::FileAttributeStore;
use crate::config::EncoderConfig;
use crate::field::{
    DecodeError, FieldDecoder, FieldDescriptor, FieldEncoder, FieldMetadata, FieldType,
};
use crate::observability::{EncodeContext, MetricsRegistry};

use super::args::{Command, EncodeArgs, InspectArgs};
use super::errors::CliResult;
use super::io::write_response;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let data = match cmd {
        Command::Encode(args) => encode(&args)?,
        Command::Inspect(args) => inspect(&args)?,
        Command::Types => types(),
    };
    write_response(data)
}

/// Register one field, plus its suffix list when `--suffices` is given.
pub fn encode(args: &EncodeArgs) -> CliResult<Value> {
    let config = match &args.config {
        Some(path) => EncoderConfig::load(path)?,
        None => EncoderConfig::default(),
    };

    let cardinality = if args.cardinality.is_empty() {
        vec![0; args.types.len()]
    } else {
        args.cardinality.clone()
    };

    let field = FieldDescriptor::new(args.name.clone(), args.entity, args.id, args.types.clone())
        .with_cardinality(cardinality)
        .with_separators(args.separators.chars());

    let mut store = FileAttributeStore::open(&args.store)?;
    let metrics = MetricsRegistry::new();
    let ctx = EncodeContext::with_log_reporter(&metrics, &config);

    let mut encoder = FieldEncoder::new(&mut store, ctx);
    encoder.encode(&field)?;
    if let Some(suffices) = &args.suffices {
        encoder.encode_suffix_list(&field, suffices)?;
    }

    Ok(json!({
        "field": field.name,
        "entity_type": field.entity_type.name(),
        "entity_id": field.entity_id,
        "store": store.path().display().to_string(),
        "metrics": metrics.snapshot(),
    }))
}

/// Decode the fields on one entity, with their component names.
///
/// The store must already exist; inspecting never creates files.
pub fn inspect(args: &InspectArgs) -> CliResult<Value> {
    let store = FileAttributeStore::open_read_only(&args.store)?;
    let metrics = MetricsRegistry::new();
    let decoder = FieldDecoder::new(&store, &metrics);

    let fields = match &args.name {
        Some(name) => vec![decoder.decode(args.entity, args.id, name)?],
        None => decoder.decode_all(args.entity, args.id)?,
    };

    let fields = fields.iter().map(field_json).collect::<Vec<_>>();

    Ok(json!({
        "entity_type": args.entity.name(),
        "entity_id": args.id,
        "fields": fields,
    }))
}

/// Known field types with their persisted tags.
pub fn types() -> Value {
    let types: Vec<Value> = FieldType::known()
        .iter()
        .map(|t| {
            json!({
                "name": t.as_str(),
                "tag": t.tag(),
                "components": t.component_count(),
            })
        })
        .collect();
    json!({ "types": types })
}

fn field_json(field: &FieldMetadata) -> Value {
    // Reserved and unknown types have no component naming; anything else is
    // reported next to the null.
    let (components, components_error) = match field.component_names() {
        Ok(names) => (Some(names), None),
        Err(DecodeError::UnsupportedComponentType { .. }) => (None, None),
        Err(e) => (None, Some(format!("{} ({})", e, e.code()))),
    };
    json!({
        "name": field.name,
        "types": field.types.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
        "separator": field.separators.iter().collect::<String>(),
        "cardinality": field.cardinality,
        "suffices": field.suffices,
        "components": components,
        "components_error": components_error,
    })
}
