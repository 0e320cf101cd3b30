//! Gauge editor CLI
//!
//! Drives the gauge editor workflow against a monitoring backend from the
//! command line.
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GAUGE_EDITOR_BASE_URL` | `http://localhost:4000` | Backend root URL. |
//! | `GAUGE_EDITOR_SERVER_ID` | *(empty)* | Monitored server id. |
//! | `GAUGE_EDITOR_REQUEST_TIMEOUT_SECS` | `30` | Per-request timeout. |
//! | `GAUGE_EDITOR_SUGGESTION_LIMIT` | `10` | Max MBean name suggestions. |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use gauge_editor::{ClientConfig, GaugeEditor, HistoryNavigator, ReqwestTransport, VERSION_PARAM};
use tracing_subscriber::EnvFilter;

const EDITOR_PATH: &str = "config/gauge";

/// Edit JVM MBean gauge definitions
#[derive(Parser)]
#[command(name = "gauge-editor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Backend root URL (overrides configuration)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Monitored server id (overrides configuration)
    #[arg(long, global = true)]
    server_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a gauge and its attribute checklist
    Show {
        /// Gauge version; omit for a blank gauge
        #[arg(long)]
        version: Option<String>,
    },

    /// Suggest MBean object names for a partial name
    Suggest {
        /// Partial object name; names containing `*` are echoed back
        fragment: String,
    },

    /// Create or update a gauge
    Save {
        /// Version of the gauge to update; omit to create
        #[arg(long)]
        version: Option<String>,

        /// MBean object name
        #[arg(long)]
        object_name: String,

        /// Attribute to sample, `NAME` or `NAME:counter` (repeatable)
        #[arg(short, long = "attribute")]
        attributes: Vec<String>,
    },

    /// Delete a gauge
    Delete {
        /// Version of the gauge to delete
        #[arg(long)]
        version: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_directive = if cli.verbose {
        "gauge_editor=debug"
    } else {
        "gauge_editor=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(server_id) = &cli.server_id {
        config = config.with_server_id(server_id);
    }
    config.validate()?;

    match cli.command {
        Commands::Show { version } => show(&config, version.as_deref()).await,
        Commands::Suggest { fragment } => suggest(&config, &fragment).await,
        Commands::Save {
            version,
            object_name,
            attributes,
        } => save(&config, version.as_deref(), &object_name, &attributes).await,
        Commands::Delete { version } => delete(&config, &version).await,
    }
}

fn editor_location(version: Option<&str>) -> String {
    match version {
        Some(version) => format!(
            "{EDITOR_PATH}{}",
            gauge_editor::api::query_string(&[(VERSION_PARAM, version)])
        ),
        None => EDITOR_PATH.to_string(),
    }
}

fn open_editor(
    config: &ClientConfig,
    version: Option<&str>,
) -> anyhow::Result<(GaugeEditor, Arc<HistoryNavigator>)> {
    let transport = Arc::new(ReqwestTransport::from_config(config)?);
    let navigator = Arc::new(HistoryNavigator::new(editor_location(version)));
    let editor = GaugeEditor::new(&config.server_id, transport, navigator.clone())
        .with_suggestion_limit(config.suggestion_limit);
    Ok((editor, navigator))
}

/// Split `NAME[:counter]`.
fn parse_attribute(raw: &str) -> (&str, bool) {
    match raw.strip_suffix(":counter") {
        Some(name) => (name, true),
        None => (raw, false),
    }
}

async fn show(config: &ClientConfig, version: Option<&str>) -> anyhow::Result<()> {
    let (mut editor, _) = open_editor(config, version)?;
    editor.load().await?;

    println!("{}", editor.heading());
    if editor.mbean_unavailable() {
        println!("MBean is not currently available");
    }
    if editor.mbean_unmatched() {
        println!("MBean object name does not match any MBean");
    }

    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Attribute", "Checked", "Counter", "Available"]);
    for choice in editor.attribute_choices() {
        table.add_row(vec![
            choice.name.clone(),
            choice.checked.to_string(),
            choice.counter.to_string(),
            choice.available.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn suggest(config: &ClientConfig, fragment: &str) -> anyhow::Result<()> {
    let (editor, _) = open_editor(config, None)?;
    for name in editor.mbean_object_names(fragment).await? {
        println!("{name}");
    }
    Ok(())
}

async fn save(
    config: &ClientConfig,
    version: Option<&str>,
    object_name: &str,
    attributes: &[String],
) -> anyhow::Result<()> {
    let (mut editor, navigator) = open_editor(config, version)?;
    editor.load().await?;
    editor.set_mbean_object_name(object_name);
    editor.select_mbean_object_name().await?;

    let names: Vec<String> = editor
        .attribute_choices()
        .iter()
        .map(|choice| choice.name.clone())
        .collect();
    for name in &names {
        editor.set_attribute_checked(name, false);
    }
    for raw in attributes {
        let (name, counter) = parse_attribute(raw);
        if !editor.set_attribute_checked(name, true) {
            bail!("MBean {object_name} has no attribute named {name}");
        }
        editor.set_attribute_counter(name, counter);
    }

    let outcome = editor.save().await?;
    println!("{} gauge version {}", outcome.message, outcome.version);
    outcome.redirect.run(navigator.as_ref()).await;
    if let Some(location) = navigator.current() {
        println!("-> {location}");
    }
    Ok(())
}

async fn delete(config: &ClientConfig, version: &str) -> anyhow::Result<()> {
    let (mut editor, navigator) = open_editor(config, Some(version))?;
    editor.load().await?;
    editor.delete().await?;
    println!("Deleted gauge version {version}");
    if let Some(location) = navigator.current() {
        println!("-> {location}");
    }
    Ok(())
}
