use clap::{Args, Parser, Subcommand};
use panel::form::{EditError, SaveError};
use panel::{Field, FormController, HttpSettingsStore, SaveOutcome, SettingsStore, StoreError};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("settings store client failed: {0}")]
    Store(#[from] StoreError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("health check failed with HTTP {0}")]
    Unhealthy(u16),
    #[error("edit rejected: {0}")]
    Edit(#[from] EditError),
    #[error("save not started: {0}")]
    Save(#[from] SaveError),
    #[error("settings store rejected the save")]
    SaveFailed,
}

#[derive(Parser, Debug)]
#[command(name = "newsdesk-cli", about = "Newsdesk admin settings CLI")]
struct Cli {
    #[arg(long, env = "NEWSDESK_BASE_URL", default_value = "http://127.0.0.1:5048")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the settings store is up.
    Ping,
    /// Load the settings form and print it.
    Show,
    /// Load the settings form, apply edits, and save.
    Save(SaveArgs),
}

/// Raw field input. Numbers stay text so the form applies its own parsing.
#[derive(Args, Debug, Default)]
struct SaveArgs {
    #[arg(long)]
    keywords: Option<String>,
    #[arg(long)]
    article_count: Option<String>,
    #[arg(long)]
    refresh_minutes: Option<String>,
}

impl SaveArgs {
    fn edits(&self) -> impl Iterator<Item = (Field, &str)> {
        [
            (Field::Keywords, self.keywords.as_deref()),
            (Field::ArticleCount, self.article_count.as_deref()),
            (Field::RefreshMinutes, self.refresh_minutes.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Ping => run_ping(&cli.base_url).await,
        Command::Show => {
            print!("{}", run_show(HttpSettingsStore::new(&cli.base_url)?).await);
            Ok(())
        }
        Command::Save(args) => {
            let controller = FormController::mount(HttpSettingsStore::new(&cli.base_url)?).await;
            let result = run_save(&controller, &args).await;
            print!("{}", controller.view().await);
            result
        }
    }
}

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let url = format!("{}/healthz", base_url.trim_end_matches('/'));
    debug!(%url, "pinging settings store");
    let status = reqwest::get(url).await?.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), "settings store health check failed");
        return Err(CliError::Unhealthy(status.as_u16()));
    }
    println!("ok");
    Ok(())
}

/// Mount the form and render it.
async fn run_show<S: SettingsStore>(store: S) -> String {
    let controller = FormController::mount(store).await;
    if let Some(record) = controller.record().await {
        warn_outside_advisory_bounds(&record);
    }
    controller.view().await.to_string()
}

fn warn_outside_advisory_bounds(record: &panel::SettingsRecord) {
    if !record.within_advisory_bounds() {
        warn!(
            article_count = record.article_count,
            refresh_minutes = record.refresh_minutes,
            "settings outside advisory ranges (articles 1-50, refresh 1-180)"
        );
    }
}

/// Apply every given edit, then save. The first rejected edit aborts before
/// anything is sent.
async fn run_save<S: SettingsStore>(controller: &FormController<S>, args: &SaveArgs) -> Result<(), CliError> {
    for (field, value) in args.edits() {
        debug!(%field, value, "applying edit");
        controller.edit(field, value).await?;
    }
    if let Some(record) = controller.record().await {
        warn_outside_advisory_bounds(&record);
    }
    match controller.save().await? {
        SaveOutcome::Saved => {
            info!("settings saved");
            Ok(())
        }
        SaveOutcome::Failed => Err(CliError::SaveFailed),
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
