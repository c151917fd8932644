//! NERDm Schema CLI
//!
//! Command-line interface for resolving NERDm definitions and assembling
//! metadata documents.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::{Parser, Subcommand};
use serde_json::Value;

use nerdm_schema::{
    add_instance, collection_schema, load_schema, load_schema_auto, merge_definitions,
    new_document, new_instance, rebase_refs, Resolver, REBASE_URL, SCHEMA_ID_URL,
};

#[derive(Parser)]
#[command(name = "nerdm-schema")]
#[command(about = "Resolve NERDm schema definitions and assemble metadata documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the definition names in a schema document
    List {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,
    },

    /// Print the default value skeleton of a definition
    Default {
        /// Schema source: file path or URL
        schema: String,

        /// Definition name (bare, e.g. Resource)
        name: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the qualified type chain of a definition
    Chain {
        /// Schema source: file path or URL
        schema: String,

        /// Definition name (bare, e.g. Resource)
        name: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print a definition's properties, required names and required defaults
    Properties {
        /// Schema source: file path or URL
        schema: String,

        /// Definition name (bare, e.g. Resource)
        name: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Synthesize a seeded instance of a definition
    Instance {
        /// Schema source: file path or URL
        schema: String,

        /// Definition name (bare, e.g. Resource)
        name: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Merge an extension schema into a core schema
    Compose {
        /// Core schema source: file path or URL
        core: String,

        /// Extension schema source to merge into the core
        #[arg(long)]
        extension: Option<String>,

        /// URL prefix to strip from the extension's $ref paths
        #[arg(long, default_value = REBASE_URL)]
        rebase: String,

        /// Emit the collection (editor) schema instead of the merged schema
        #[arg(long)]
        collection: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Create a new metadata document containing only the header
    Init {
        /// Author recorded in the header (defaults to $USER)
        #[arg(long)]
        author: Option<String>,

        /// Schema identifier recorded in the header
        #[arg(long, default_value = SCHEMA_ID_URL)]
        schema_url: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Append an instance of a definition to a metadata document
    Add {
        /// Metadata document to extend
        document: PathBuf,

        /// Schema source: file path or URL
        schema: String,

        /// Definition name (bare, e.g. Resource)
        name: String,

        /// Instance file to append (default: synthesize a fresh instance)
        #[arg(long)]
        instance: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Output file (defaults to rewriting the document in place)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List { schema } => run_list(&schema),

        Commands::Default {
            schema,
            name,
            pretty,
            output,
        } => run_default(&schema, &name, pretty, output),

        Commands::Chain {
            schema,
            name,
            pretty,
            output,
        } => run_chain(&schema, &name, pretty, output),

        Commands::Properties {
            schema,
            name,
            pretty,
            output,
        } => run_properties(&schema, &name, pretty, output),

        Commands::Instance {
            schema,
            name,
            pretty,
            output,
        } => run_instance(&schema, &name, pretty, output),

        Commands::Compose {
            core,
            extension,
            rebase,
            collection,
            pretty,
            output,
        } => run_compose(&core, extension.as_deref(), &rebase, collection, pretty, output),

        Commands::Init {
            author,
            schema_url,
            pretty,
            output,
        } => run_init(author, &schema_url, pretty, output),

        Commands::Add {
            document,
            schema,
            name,
            instance,
            pretty,
            output,
        } => run_add(document, &schema, &name, instance, pretty, output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn load_source(source: &str) -> Result<Value, u8> {
    load_schema_auto(source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn run_list(schema_source: &str) -> Result<(), u8> {
    let schema = load_source(schema_source)?;
    let resolver = Resolver::for_document(&schema).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    for name in resolver.definition_names() {
        println!("{}", name);
    }
    Ok(())
}

fn run_default(
    schema_source: &str,
    name: &str,
    pretty: bool,
    output: Option<PathBuf>,
) -> Result<(), u8> {
    let schema = load_source(schema_source)?;
    let value = Resolver::for_document(&schema)
        .and_then(|r| r.default_value_of(name))
        .map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;

    write_json(&value, pretty, output.as_ref())
}

fn run_chain(
    schema_source: &str,
    name: &str,
    pretty: bool,
    output: Option<PathBuf>,
) -> Result<(), u8> {
    let schema = load_source(schema_source)?;
    let chain = Resolver::for_document(&schema)
        .and_then(|r| r.type_chain_of(name))
        .map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;

    write_json(&chain, pretty, output.as_ref())
}

fn run_properties(
    schema_source: &str,
    name: &str,
    pretty: bool,
    output: Option<PathBuf>,
) -> Result<(), u8> {
    let schema = load_source(schema_source)?;
    let set = Resolver::for_document(&schema)
        .and_then(|r| r.properties_of(name))
        .map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;

    write_json(&set, pretty, output.as_ref())
}

fn run_instance(
    schema_source: &str,
    name: &str,
    pretty: bool,
    output: Option<PathBuf>,
) -> Result<(), u8> {
    let schema = load_source(schema_source)?;
    let instance = Resolver::for_document(&schema)
        .and_then(|r| new_instance(&r, name))
        .map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;

    write_json(&instance, pretty, output.as_ref())
}

fn run_compose(
    core_source: &str,
    extension_source: Option<&str>,
    rebase: &str,
    collection: bool,
    pretty: bool,
    output: Option<PathBuf>,
) -> Result<(), u8> {
    let mut core = load_source(core_source)?;

    if let Some(source) = extension_source {
        let mut extension = load_source(source)?;
        rebase_refs(&mut extension, rebase);
        merge_definitions(&mut core, &extension).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;
    }

    let result = if collection {
        collection_schema(&core).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?
    } else {
        core
    };

    write_json(&result, pretty, output.as_ref())
}

fn run_init(
    author: Option<String>,
    schema_url: &str,
    pretty: bool,
    output: Option<PathBuf>,
) -> Result<(), u8> {
    let author = author
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "unknown".to_string());

    let document = new_document(schema_url, &author, Local::now());
    write_json(&document, pretty, output.as_ref())
}

fn run_add(
    document_path: PathBuf,
    schema_source: &str,
    name: &str,
    instance_path: Option<PathBuf>,
    pretty: bool,
    output: Option<PathBuf>,
) -> Result<(), u8> {
    let mut document = load_schema(&document_path).map_err(|e| {
        eprintln!("Error loading document: {}", e);
        e.exit_code() as u8
    })?;

    let schema = load_source(schema_source)?;
    let resolver = Resolver::for_document(&schema).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let instance = match instance_path {
        Some(path) => {
            // Names are validated against the schema even when the
            // instance itself comes from a file.
            resolver.definition(name).map_err(|e| {
                eprintln!("Error: {}", e);
                e.exit_code() as u8
            })?;
            load_schema(&path).map_err(|e| {
                eprintln!("Error loading instance: {}", e);
                e.exit_code() as u8
            })?
        }
        None => new_instance(&resolver, name).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?,
    };

    add_instance(&mut document, name, instance).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let target = output.unwrap_or(document_path);
    write_json(&document, pretty, Some(&target))
}

/// Serialize a value and write it to the output file or stdout.
fn write_json<T: serde::Serialize>(
    value: &T,
    pretty: bool,
    output: Option<&PathBuf>,
) -> Result<(), u8> {
    let json_output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(path, &json_output).map_err(|e| {
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
