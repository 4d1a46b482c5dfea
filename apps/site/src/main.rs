use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use catalog::{Catalog, CatalogPresenter};
use clap::{Parser, Subcommand};
use contact_core::{ContactFormController, SubmitOutcome};
use shared::domain::{FilterType, FormField, ViewMode};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(about = "Portfolio projects and contact form")]
struct Cli {
    #[arg(long, default_value = "site.toml")]
    config: PathBuf,
    /// Log the underlying cause of failed submissions.
    #[arg(long)]
    diagnostics: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List projects passing a filter.
    Projects {
        #[arg(long, default_value_t = FilterType::All)]
        filter: FilterType,
        #[arg(long, default_value_t = ViewMode::Grid)]
        view: ViewMode,
    },
    /// Show the detail view of one project.
    Project { title: String },
    Stats,
    /// Validate and send a message through the form relay.
    Contact {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config)?;
    settings.diagnostics |= cli.diagnostics;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Projects { filter, view } => {
            let mut presenter = load_presenter(&settings)?;
            presenter.set_filter(filter);
            presenter.set_view_mode(view);
            print!("{}", render::project_list(&presenter));
        }
        Command::Project { title } => {
            let mut presenter = load_presenter(&settings)?;
            presenter.select_project(&title)?;
            let detail = presenter
                .detail()
                .ok_or_else(|| anyhow!("no project selected"))?;
            print!("{}", render::project_detail(&detail));
            presenter.close_detail();
        }
        Command::Stats => {
            let presenter = load_presenter(&settings)?;
            print!("{}", render::stats(&presenter.stats()));
        }
        Command::Contact {
            name,
            email,
            message,
        } => send_contact(&settings, name, email, message).await?,
    }

    Ok(())
}

fn load_presenter(settings: &Settings) -> Result<CatalogPresenter> {
    let catalog = match &settings.catalog_path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog from '{}'", path.display()))?,
        None => Catalog::builtin().context("failed to load builtin catalog")?,
    };
    Ok(CatalogPresenter::new(catalog))
}

async fn send_contact(
    settings: &Settings,
    name: String,
    email: String,
    message: String,
) -> Result<()> {
    let controller = ContactFormController::over_http(&settings.form_endpoint)?
        .with_diagnostics(settings.diagnostics);
    controller.update_field(FormField::Name, name).await;
    controller.update_field(FormField::Email, email).await;
    controller.update_field(FormField::Message, message).await;

    match controller.submit().await {
        Ok(SubmitOutcome::Sent(receipt)) => {
            info!(next = ?receipt.next, "message delivered");
            println!("Message sent! Thanks for reaching out.");
            Ok(())
        }
        Ok(SubmitOutcome::Invalid(_)) => {
            eprint!("{}", render::form_errors(&controller.snapshot().await));
            Err(anyhow!("contact form has invalid fields"))
        }
        Ok(SubmitOutcome::InFlight) => Err(anyhow!("a submission is already in flight")),
        Err(err) => {
            error!("contact form submission failed");
            Err(anyhow!(err.user_message()))
        }
    }
}
