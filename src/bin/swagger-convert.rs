//! Swagger Schema Converter CLI
//!
//! Command-line interface for converting between Swagger models and properties.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use swagger_convert::{
    load_schema_auto, model_from_value, model_to_value, navigate_fragment, property_to_value,
    ConvertError, Direction, SchemaConverter,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "swagger-convert")]
#[command(about = "Convert Swagger schemas between model and property form")]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a schema in one direction
    Convert {
        /// Schema source: file path or URL (http:// or https://)
        source: String,

        /// Treat the input as a model and convert it to a property
        #[arg(
            long,
            conflicts_with = "to_model",
            required_unless_present = "to_model"
        )]
        to_property: bool,

        /// Treat the input as a property and convert it to a model
        #[arg(long, conflicts_with = "to_property")]
        to_model: bool,

        /// JSON Pointer to the schema inside the document (e.g. #/definitions/Pet)
        #[arg(long, short)]
        pointer: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Convert a model to a property and back, showing both results
    Roundtrip {
        /// Schema source: file path or URL (http:// or https://)
        source: String,

        /// JSON Pointer to the schema inside the document (e.g. #/definitions/Pet)
        #[arg(long, short)]
        pointer: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            source,
            to_property,
            to_model: _,
            pointer,
            output,
            pretty,
        } => run_convert(
            &source,
            Direction::from_property_flag(to_property),
            pointer.as_deref(),
            output,
            pretty,
        ),
        Commands::Roundtrip {
            source,
            pointer,
            pretty,
        } => run_roundtrip(&source, pointer.as_deref(), pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("swagger_convert=debug")
        } else {
            EnvFilter::new("swagger_convert=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn run_convert(
    source: &str,
    direction: Direction,
    pointer: Option<&str>,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let schema = load_input(source, pointer)?;

    tracing::debug!(?direction, source, "converting schema");
    let converted = SchemaConverter::new()
        .convert(&schema, direction)
        .map_err(report)?;

    let json_output = render(&converted, pretty)?;
    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_roundtrip(source: &str, pointer: Option<&str>, pretty: bool) -> Result<(), u8> {
    let schema = load_input(source, pointer)?;
    let model = model_from_value(&schema).map_err(report)?;

    let converter = SchemaConverter::new();
    let property = converter.model_to_property(&model);
    let back = converter.property_to_model(&property);

    let result = json!({
        "property": property_to_value(&property),
        "model": model_to_value(&back),
    });
    println!("{}", render(&result, pretty)?);
    Ok(())
}

/// Load the document and select the schema at `pointer`, if given.
fn load_input(source: &str, pointer: Option<&str>) -> Result<Value, u8> {
    let document = load_schema_auto(source).map_err(report)?;
    match pointer {
        Some(fragment) => navigate_fragment(&document, fragment)
            .cloned()
            .map_err(report),
        None => Ok(document),
    }
}

fn render(value: &Value, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

fn report(e: ConvertError) -> u8 {
    eprintln!("Error: {}", e);
    e.exit_code() as u8
}
