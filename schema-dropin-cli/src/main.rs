use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use schema_dropin::{
    merger, validator, ContentItem, JsonFileStore, ManualSchemaEditor, MetaStore, NoopInvalidator,
    OrganizationSettings, RenderedSchema, SchemaDates, SchemaPipeline, SiteConfig,
    ValidationResult, CONFIG_TEMPLATE,
};
use serde_json::Value;
use std::io::Read;
use std::net::SocketAddr;
use std::{fs, path::PathBuf};
use tracing::{info, warn, Level};

mod server;

/// Schema drop-in
/// Merges hand-authored schema.org JSON-LD into generated schema graphs
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output for detailed processing information
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a manual JSON-LD document ("-" reads stdin)
    Validate {
        #[arg(value_name = "PATH TO SCHEMA")]
        input: PathBuf,
    },
    /// Merge a manual schema into a generated graph
    Merge {
        /// Generated graph: a JSON array or an object with @graph
        #[arg(short, long, value_name = "PATH TO GRAPH")]
        graph: PathBuf,

        /// Manual schema text; may contain date variables
        #[arg(short, long, value_name = "PATH TO SCHEMA")]
        manual: PathBuf,

        /// Value for {{fm_schema_created_date}} (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        created: Option<String>,

        /// Value for {{fm_schema_last_updated_date}} (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        modified: Option<String>,

        /// Emit the manual schema standalone as a script tag instead of merging
        #[arg(long)]
        no_merge: bool,

        /// Emit the generated graph unchanged when the manual schema is unusable
        #[arg(long)]
        lenient: bool,

        /// Write the result here instead of stdout
        #[arg(short, long, value_name = "OUTPUT PATH")]
        output: Option<PathBuf>,
    },
    /// Render the schema for a stored content item
    Render {
        #[arg(short, long, value_name = "PATH TO CONFIG", default_value = "schema.jsonc")]
        config: PathBuf,

        /// Content item description (id, postType, created, modified, ...)
        #[arg(short, long, value_name = "PATH TO ITEM")]
        item: PathBuf,

        #[arg(short, long, value_name = "PATH TO GRAPH")]
        graph: PathBuf,

        #[arg(short, long, value_name = "OUTPUT PATH")]
        output: Option<PathBuf>,
    },
    /// Manage the manual schema stored on a content item
    Item {
        #[arg(short, long, value_name = "PATH TO CONFIG", default_value = "schema.jsonc")]
        config: PathBuf,

        #[command(subcommand)]
        action: ItemAction,
    },
    /// Serve the organization settings REST API
    Serve {
        #[arg(short, long, value_name = "PATH TO CONFIG", default_value = "schema.jsonc")]
        config: PathBuf,

        /// Override the bind address from the config
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// Generate a site config template
    GenerateConfig {
        #[arg(
            short,
            long,
            default_value = "schema.jsonc",
            value_name = "OUTPUT PATH"
        )]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum ItemAction {
    /// Validate and store manual schema on an item
    Set {
        #[arg(long)]
        id: u64,
        #[arg(long, default_value = "page")]
        post_type: String,
        #[arg(short, long, value_name = "PATH TO SCHEMA")]
        schema: PathBuf,
        /// Render standalone instead of merging into the generated graph
        #[arg(long)]
        no_merge: bool,
        /// Store the text even if it does not validate
        #[arg(long)]
        force: bool,
    },
    /// Clear the manual schema of an item
    Remove {
        #[arg(long)]
        id: u64,
        #[arg(long, default_value = "page")]
        post_type: String,
    },
    /// Print the stored manual schema and merge flag
    Show {
        #[arg(long)]
        id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with appropriate level
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Validate { input } => validate_command(input),
        Commands::Merge {
            graph,
            manual,
            created,
            modified,
            no_merge,
            lenient,
            output,
        } => merge_command(
            graph,
            manual,
            created,
            modified,
            MergeMode {
                no_merge: *no_merge,
                lenient: *lenient,
            },
            output,
        ),
        Commands::Render {
            config,
            item,
            graph,
            output,
        } => render_command(config, item, graph, output),
        Commands::Item { config, action } => item_command(config, action),
        Commands::Serve { config, bind } => serve_command(config, *bind).await,
        Commands::GenerateConfig { output } => generate_config_command(output),
    }
}

fn read_input(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read schema from stdin")?;
        return Ok(text);
    }
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    fs::read_to_string(path).context(format!("Failed to read {}", path.display()))
}

fn read_graph(path: &PathBuf) -> Result<Vec<Value>> {
    let text = read_input(path)?;
    let value: Value = serde_json::from_str(&text)
        .context(format!("Generated graph {} is not valid JSON", path.display()))?;
    Ok(match value {
        Value::Array(nodes) => nodes,
        Value::Object(mut envelope) => match envelope.remove("@graph") {
            Some(Value::Array(nodes)) => nodes,
            Some(_) => anyhow::bail!("@graph in {} must be an array", path.display()),
            None => vec![Value::Object(envelope)],
        },
        other => vec![other],
    })
}

fn write_output(output: &Option<PathBuf>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .context(format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, contents).context(format!("Failed to write {}", path.display()))?;
            info!("Wrote output to {}", path.display());
        }
        None => println!("{}", contents),
    }
    Ok(())
}

fn load_config(path: &PathBuf) -> Result<SiteConfig> {
    if !path.exists() {
        anyhow::bail!(
            "Config file not found: {}. Try `schema-dropin generate-config` or --config <PATH TO CONFIG>",
            path.display()
        );
    }
    let config = SiteConfig::from_file(path).context("Failed to load site config")?;
    config.validate().context("Failed to validate site config")?;
    Ok(config)
}

fn validate_command(input: &PathBuf) -> Result<()> {
    info!("Validating manual schema...");
    let text = read_input(input)?;
    match validator::validate_text(&text) {
        ValidationResult::Ok => {
            info!("Schema is valid");
            Ok(())
        }
        ValidationResult::Error(message) => anyhow::bail!("Schema validation failed: {}", message),
    }
}

struct MergeMode {
    no_merge: bool,
    lenient: bool,
}

fn merge_command(
    graph: &PathBuf,
    manual: &PathBuf,
    created: &Option<String>,
    modified: &Option<String>,
    mode: MergeMode,
    output: &Option<PathBuf>,
) -> Result<()> {
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    let created = created.clone().unwrap_or_else(|| today.clone());
    let modified = modified.clone().unwrap_or(today);
    let dates = SchemaDates::parse(&created, &modified).context("Invalid date argument")?;

    let manual_text = read_input(manual)?;

    if mode.no_merge {
        let substituted = schema_dropin::template::substitute(&manual_text, &dates);
        let document: Value =
            serde_json::from_str(&substituted).context("Manual schema is not valid JSON")?;
        let script = schema_dropin::script_tag(&document).context("Failed to render script tag")?;
        return write_output(output, &script);
    }

    let auto_graph = read_graph(graph)?;
    info!("Merging manual schema into {} generated node(s)", auto_graph.len());
    let merged = match merger::merge(auto_graph.clone(), &manual_text, &dates) {
        Ok(merged) => merged,
        Err(e) if mode.lenient && e.is_unusable_document() => {
            warn!("Ignoring unusable manual schema: {}", e);
            auto_graph
        }
        Err(e) => return Err(e).context("Failed to merge manual schema"),
    };
    let rendered = serde_json::to_string_pretty(&merged)?;
    write_output(output, &rendered)
}

fn render_command(
    config_path: &PathBuf,
    item_path: &PathBuf,
    graph: &PathBuf,
    output: &Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let item: ContentItem = serde_json::from_str(&read_input(item_path)?)
        .context(format!("Invalid content item in {}", item_path.display()))?;
    let host_graph = read_graph(graph)?;

    let meta = JsonFileStore::open(config.store_path()).context("Failed to open schema store")?;
    let settings = OrganizationSettings::new(
        config.clone(),
        JsonFileStore::open(config.store_path()).context("Failed to open schema store")?,
        NoopInvalidator,
    );

    info!("Rendering schema for item {} ({})", item.id, item.post_type);
    let rendered = SchemaPipeline::new(&meta)
        .output_page_schema(host_graph, &item, &settings)
        .context("Failed to render schema")?;

    match rendered {
        RenderedSchema::Graph(graph) => write_output(output, &serde_json::to_string_pretty(&graph)?),
        RenderedSchema::Standalone { script } => write_output(output, &script),
    }
}

fn item_command(config_path: &PathBuf, action: &ItemAction) -> Result<()> {
    let config = load_config(config_path)?;
    let mut store = JsonFileStore::open(config.store_path()).context("Failed to open schema store")?;
    let today = chrono::Local::now().date_naive();

    match action {
        ItemAction::Set {
            id,
            post_type,
            schema,
            no_merge,
            force,
        } => {
            let text = read_input(schema)?;
            let item = ContentItem::new(*id, post_type.clone(), today, today);
            let mut editor = ManualSchemaEditor::new(&config, &mut store, &NoopInvalidator);
            let saved = if *force {
                editor.save_unchecked(&item, &text, !no_merge)
            } else {
                editor.apply(&item, &text, !no_merge)
            };
            saved.context(format!("Failed to save manual schema for item {}", id))?;
            info!("Saved manual schema for item {}", id);
        }
        ItemAction::Remove { id, post_type } => {
            let item = ContentItem::new(*id, post_type.clone(), today, today);
            ManualSchemaEditor::new(&config, &mut store, &NoopInvalidator)
                .remove(&item)
                .context(format!("Failed to remove manual schema for item {}", id))?;
            info!("Removed manual schema from item {}", id);
        }
        ItemAction::Show { id } => {
            let merge = store.merge_enabled(*id)?;
            match store.manual_schema(*id)? {
                Some(text) => {
                    info!("Item {} (merge with generated schema: {})", id, merge);
                    println!("{}", text);
                }
                None => info!("Item {} has no manual schema", id),
            }
        }
    }
    Ok(())
}

async fn serve_command(config_path: &PathBuf, bind: Option<SocketAddr>) -> Result<()> {
    let config = load_config(config_path)?;
    if config.admin_token.is_none() {
        anyhow::bail!("adminToken must be set in the config to serve the settings API");
    }

    let addr = bind.unwrap_or(config.bind);
    let store = JsonFileStore::open(config.store_path()).context("Failed to open schema store")?;
    let admin_token = config.admin_token.clone();
    let settings = OrganizationSettings::new(config, store, NoopInvalidator);
    let app = server::app(server::AppState::new(settings, admin_token));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!("Settings API listening on http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn generate_config_command(output: &PathBuf) -> Result<()> {
    info!("Generating site config template...");

    // if output is a directory, append the default file name
    let full_file_output_path = if output.is_dir() {
        output.join("schema.jsonc")
    } else {
        output.into()
    };

    fs::write(&full_file_output_path, CONFIG_TEMPLATE).context(format!(
        "Failed to write config to: {}",
        output.display()
    ))?;

    info!(
        "Successfully generated config template at: {}",
        full_file_output_path.display()
    );
    Ok(())
}
