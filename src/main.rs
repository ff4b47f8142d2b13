use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use doc_versions::admin::collaborators::{AllowAll, LogNotifier};
use doc_versions::admin::page::{PageModel, PluginPage};
use doc_versions::admin::view::{Affordance, RenderModel};
use doc_versions::config::{self, AdminConfig};
use doc_versions::documentation::http::HttpDocumentationApi;
use doc_versions::logging::{self, LogTarget};

#[derive(Parser)]
#[command(name = "doc-versions")]
#[command(version, about = "Manage generated documentation versions")]
struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/doc-versions/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override api.baseUrl from the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log to stderr instead of the log file
    #[arg(long, global = true)]
    log_stderr: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List documentation versions
    List {
        /// Print the page model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the viewer URL of a version, or of the current version
    Open { version: Option<String> },
    /// Regenerate the documentation of a version
    Regenerate { version: String },
    /// Delete the documentation of a version
    Delete { version: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_path = config::log_path();
    let _guard = logging::init(if cli.log_stderr {
        LogTarget::Stderr
    } else {
        LogTarget::File(&log_path)
    })?;

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let mut config = AdminConfig::load(&config_path)?;
    if let Some(base_url) = cli.base_url.clone() {
        config.api.base_url = base_url;
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command, config))
}

async fn run(command: Command, config: AdminConfig) -> anyhow::Result<()> {
    let api = HttpDocumentationApi::from_config(&config.api)?;
    let page = PluginPage::new(
        Arc::new(api),
        Arc::new(LogNotifier),
        Arc::new(AllowAll),
        config.viewer_base_url(),
    );

    page.mount().await;

    let result = match command {
        Command::List { json } => {
            let model = page.render();
            if json {
                println!("{}", serde_json::to_string_pretty(&model)?);
            } else {
                print_page(&model);
            }
            Ok(())
        }
        Command::Open { version } => {
            let url = match version {
                Some(version) => page.open(&version),
                None => page.open_documentation(),
            }?;
            println!("{url}");
            Ok(())
        }
        Command::Regenerate { version } => page
            .regenerate(&version)
            .await
            .with_context(|| format!("failed to regenerate {version}")),
        Command::Delete { version } => page
            .delete(&version)
            .await
            .with_context(|| format!("failed to delete {version}")),
    };

    page.unmount();
    result
}

fn print_page(model: &PageModel) {
    println!("{}", model.header.title);
    println!("{}", model.header.subtitle);
    println!();

    match &model.body {
        RenderModel::Loading => println!("Loading..."),
        RenderModel::Empty => println!("No documentation has been generated yet."),
        RenderModel::EmptyWithError { reason, message } => {
            println!("Could not load versions ({}): {}", reason.as_str(), message);
        }
        RenderModel::Table { rows } => {
            println!("{:<16} {:<18} ACTIONS", "VERSION", "LAST GENERATED");
            for row in rows {
                let actions: Vec<&str> = [
                    &row.actions.open,
                    &row.actions.regenerate,
                    &row.actions.delete,
                ]
                .into_iter()
                .filter(|a| a.enabled)
                .map(action_name)
                .collect();
                let marker = if row.is_current { " *" } else { "" };
                println!(
                    "{:<16} {:<18} {}",
                    format!("{}{}", row.id, marker),
                    row.generated_at_label,
                    actions.join(", ")
                );
            }
        }
    }
}

fn action_name(affordance: &Affordance) -> &str {
    affordance
        .label
        .split_whitespace()
        .next()
        .unwrap_or(&affordance.label)
}
