//! mapcache CLI
//!
//! Exercises the mapping resource cache against a directory of sources and
//! renders array values as delimited rows.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mapcache_cache::{CacheSettings, ResourceCache};
use mapcache_core::traits::PropertySource;
use mapcache_core::types::SourceKeys;
use mapcache_csv::{ArraySchema, DelimitedRowWriter};
use mapcache_store::{EnvProperties, FileEntryStore, JsonDocumentBuilder, StaticProperties};

/// mapcache - TTL cache for compiled mapping resources
#[derive(Parser)]
#[command(name = "mapcache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a mapping resource through the cache, optionally repeatedly
    Resolve {
        /// Directory the source keys resolve under
        #[arg(long)]
        root: PathBuf,
        /// Instance identifier the entry is cached under
        #[arg(long, default_value = "default")]
        instance: String,
        /// Key of the mapping configuration
        #[arg(long)]
        config: String,
        /// Key of the input schema
        #[arg(long)]
        input: String,
        /// Key of the output schema
        #[arg(long)]
        output: String,
        /// Number of lookups to perform
        #[arg(long, default_value = "1")]
        repeat: u32,
        /// Pause between lookups, in milliseconds
        #[arg(long, default_value = "0")]
        interval_ms: u64,
        /// Cache TTL in milliseconds (otherwise read from the environment)
        #[arg(long)]
        ttl_ms: Option<u64>,
    },

    /// Render a JSON array as one delimited row
    Row {
        /// JSON file holding the array schema
        #[arg(long, conflicts_with = "fields")]
        schema: Option<PathBuf>,
        /// Expected element count (untyped)
        #[arg(long)]
        fields: Option<usize>,
        /// The array value, as JSON
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "mapcache=debug,info"
    } else {
        "mapcache=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Resolve {
            root,
            instance,
            config,
            input,
            output,
            repeat,
            interval_ms,
            ttl_ms,
        } => cmd_resolve(
            &root,
            &instance,
            SourceKeys::new(config, input, output),
            repeat,
            Duration::from_millis(interval_ms),
            ttl_ms,
        ),
        Commands::Row {
            schema,
            fields,
            value,
        } => cmd_row(schema.as_deref(), fields, &value),
    }
}

/// Fetch a mapping resource through the cache
fn cmd_resolve(
    root: &Path,
    instance: &str,
    keys: SourceKeys,
    repeat: u32,
    interval: Duration,
    ttl_ms: Option<u64>,
) -> Result<()> {
    if !root.is_dir() {
        bail!("source root {} is not a directory", root.display());
    }

    let settings = CacheSettings::from_env().context("Invalid cache settings")?;
    let properties: Arc<dyn PropertySource> = match ttl_ms {
        Some(ms) => Arc::new(StaticProperties::from_pairs([(
            settings.ttl_property.clone(),
            ms.to_string(),
        )])),
        None => Arc::new(EnvProperties::default()),
    };

    let cache = ResourceCache::new(
        JsonDocumentBuilder,
        Arc::new(FileEntryStore::new(root)),
        properties,
    )
    .with_settings(&settings);

    println!("{} {}", "🗂  Resolving mapping for:".cyan().bold(), instance);
    info!(root = %root.display(), repeat, "Starting lookups");

    let mut previous = None;
    for i in 1..=repeat.max(1) {
        let resource = cache
            .get_resource(instance, &keys)
            .with_context(|| format!("Lookup {} failed", i))?;

        let status = match &previous {
            Some(prev) if Arc::ptr_eq(prev, &resource) => "cached".green(),
            Some(_) => "rebuilt".yellow(),
            None => "built".blue(),
        };
        println!(
            "   {} #{} {} ({} → {})",
            "lookup".dimmed(),
            i,
            status,
            resource.input_title().unwrap_or("<untitled>"),
            resource.output_title().unwrap_or("<untitled>"),
        );
        previous = Some(resource);

        if i < repeat && !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }

    let stats = cache.stats();
    println!("\n{}", "📊 Cache stats:".yellow().bold());
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}

/// Render a JSON array as a delimited row
fn cmd_row(schema: Option<&Path>, fields: Option<usize>, value: &str) -> Result<()> {
    let schema = match (schema, fields) {
        (Some(path), _) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read schema {}", path.display()))?;
            serde_json::from_str::<ArraySchema>(&text).context("Invalid array schema")?
        }
        (None, Some(count)) => ArraySchema::untyped("row", count),
        (None, None) => ArraySchema::new("row"),
    };

    let line = DelimitedRowWriter::new()
        .write_array_text(&schema, value)
        .context("Failed to render row")?;
    println!("{}", line);

    Ok(())
}
