use std::io::{self, BufReader, IsTerminal};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use nutriplan_import::{
    api::routes::create_router,
    config::{Config, APP_NAME},
    entry::background::{Background, CommandHint},
    entry::injected::{Injected, InjectedRun},
    entry::settings_page::SettingsPage,
    form::{ConsoleForm, FormInput, TerminalForm},
    notify::{PanelNotifier, SystemNotifier},
    store::{LocalStore, SyncedStore},
    transport::HttpTransport,
    AppState,
};

/// Send the page you are reading to your NutriPlan app for recipe import.
#[derive(Debug, Parser)]
#[command(name = "nutriplan-import")]
#[command(about = "Send recipe pages to a NutriPlan app", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Import one page using the page-local settings, asking for them if missing.
    Import {
        /// URL of the page to import.
        url: String,
    },

    /// Run the background daemon that handles toolbar actions.
    Serve,

    /// Show or change the synced settings.
    Settings {
        /// API token issued by the NutriPlan app.
        #[arg(long)]
        token: Option<String>,

        /// Base URL of the NutriPlan app.
        #[arg(long)]
        url: Option<String>,

        /// Print the stored values instead of editing them.
        #[arg(long, conflicts_with_all = ["token", "url"])]
        show: bool,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<ExitCode> {
        let cli = Cli::parse();
        let config = Config::load()?;
        tracing::debug!("loaded config: {:?}", config);

        match cli.command {
            CliCommand::Import { url } => run_import(&config, &url).await,
            CliCommand::Serve => run_serve(&config).await,
            CliCommand::Settings { token, url, show } => run_settings(&config, token, url, show).await,
        }
    }
}

fn synced_store(config: &Config) -> Result<SyncedStore> {
    let path = config.sync_store_path()?;
    Ok(SyncedStore::new(path, config.extension_id.clone()))
}

/// Hidden-input prompts on a terminal, plain line reads when stdin is piped.
fn settings_form() -> Box<dyn FormInput> {
    if io::stdin().is_terminal() {
        Box::new(ConsoleForm::new())
    } else {
        Box::new(TerminalForm::new(BufReader::new(io::stdin()), io::stdout()))
    }
}

async fn run_import(config: &Config, url: &str) -> Result<ExitCode> {
    let store = LocalStore::new(&config.local_store_path);
    let transport = HttpTransport::new();
    let notifier = PanelNotifier::new(io::stdout());
    let mut form = settings_form();

    let run = Injected::new(&store, &transport, &notifier)
        .run(url, form.as_mut())
        .await
        .with_context(|| format!("import via {}", store.path().display()))?;

    Ok(match run {
        InjectedRun::Imported(outcome) if outcome.is_error() => ExitCode::FAILURE,
        InjectedRun::Imported(_) => ExitCode::SUCCESS,
        InjectedRun::Configured(Some(_)) => ExitCode::SUCCESS,
        InjectedRun::Configured(None) => ExitCode::FAILURE,
    })
}

async fn run_serve(config: &Config) -> Result<ExitCode> {
    let store = synced_store(config)?;
    tracing::info!(store = %store.path().display(), "using synced settings");

    let background = Background::new(
        Arc::new(store),
        Arc::new(HttpTransport::new()),
        Arc::new(SystemNotifier),
        Arc::new(CommandHint {
            command: format!("{} settings", APP_NAME),
        }),
    );

    let server_addr = config.server_addr;
    let app_state = AppState {
        background: Arc::new(background),
    };
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr)
        .await
        .with_context(|| format!("bind {}", server_addr))?;
    tracing::info!("listening on {}", server_addr);
    println!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(ExitCode::SUCCESS)
}

async fn run_settings(
    config: &Config,
    token: Option<String>,
    url: Option<String>,
    show: bool,
) -> Result<ExitCode> {
    let store = synced_store(config)?;
    let page = SettingsPage::new(&store);

    if show {
        let values = page.load().await?;
        println!("API Token: {}", if values.api_token.is_some() { "(saved)" } else { "(not set)" });
        println!("Application URL: {}", values.app_url.as_deref().unwrap_or("(not set)"));
        return Ok(ExitCode::SUCCESS);
    }

    if token.is_some() || url.is_some() {
        // Fields left off the command line keep their stored value.
        let current = page.load().await?;
        let token = token.or(current.api_token).unwrap_or_default();
        let url = url.or(current.app_url).unwrap_or_default();

        let outcome = page.save(&token, &url).await?;
        if outcome.is_saved() {
            println!("{}", outcome.message());
            return Ok(ExitCode::SUCCESS);
        }
        eprintln!("{}", outcome.message());
        return Ok(ExitCode::FAILURE);
    }

    let mut form = settings_form();
    match page.edit(form.as_mut()).await? {
        Some(_) => Ok(ExitCode::SUCCESS),
        None => Ok(ExitCode::FAILURE),
    }
}
