//! NER Stand CLI - Command-line interface
//!
//! Usage:
//!   ner-stand predict <text> [--framework F] [--model M]
//!   ner-stand form
//!   ner-stand models [--framework F]
//!   ner-stand health

mod form;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ner_client::HttpPredictionClient;
use ner_core::{
    is_suggested, suggested_models, AppConfig, FormField, Framework, Locale, PayloadSchema,
    RequestStatus,
};
use ner_session::{ResultRenderer, SessionState};

#[derive(Parser)]
#[command(name = "ner-stand")]
#[command(about = "Client for a named entity recognition service")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the NER service
    #[arg(long, global = true)]
    url: Option<String>,

    /// Request body shape: with_framework | model_only
    #[arg(long, global = true)]
    schema: Option<PayloadSchema>,

    /// Label language: en | ru
    #[arg(long, global = true)]
    locale: Option<Locale>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one text and print the extracted entities
    Predict {
        /// Text to analyze
        text: String,
        /// Framework: spacy | hf | flair
        #[arg(short, long)]
        framework: Option<Framework>,
        /// Model name
        #[arg(short, long)]
        model: Option<String>,
        /// Print the display model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fill in and submit the form interactively
    Form,
    /// List suggested models per framework
    Models {
        #[arg(short, long)]
        framework: Option<Framework>,
    },
    /// Check that the service is reachable
    Health,
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };

    if let Some(url) = &cli.url {
        config.service.base_url = url.clone();
    }
    if let Some(schema) = cli.schema {
        config.service.payload_schema = schema;
    }
    if let Some(locale) = cli.locale {
        config.ui.locale = locale;
    }

    Ok(config)
}

/// Model names outside the catalog are allowed; only note them
fn warn_if_unsuggested(session: &SessionState) {
    let form = session.form();
    if !is_suggested(form.framework, &form.model_name) {
        tracing::warn!(
            framework = %form.framework,
            model = %form.model_name,
            "model is not among the suggestions for this framework"
        );
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    logging::init(&config.logging);

    match cli.command {
        Commands::Predict {
            text,
            framework,
            model,
            json,
        } => {
            let client = HttpPredictionClient::from_config(&config.service)?;
            let mut session = SessionState::from_config(&config.ui);

            session.on_field_change(FormField::Text(text));
            if let Some(framework) = framework {
                session.on_field_change(FormField::Framework(framework));
            }
            if let Some(model) = model {
                session.on_field_change(FormField::ModelName(model));
            }

            // JSON output keeps stdout to a single document
            let status = if json {
                form::submit_with_progress(&mut session, &client, &mut std::io::stderr()).await?
            } else {
                form::submit_with_progress(&mut session, &client, &mut std::io::stdout()).await?
            };
            let display = ResultRenderer::render(&session);

            if json {
                println!("{}", serde_json::to_string_pretty(&display)?);
            } else {
                print!("{display}");
            }

            if status == RequestStatus::Failed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Form => {
            let client = HttpPredictionClient::from_config(&config.service)?;
            let mut session = SessionState::from_config(&config.ui);
            form::run(&mut session, &client).await?;
        }
        Commands::Models { framework } => {
            let frameworks = match framework {
                Some(f) => vec![f],
                None => Framework::ALL.to_vec(),
            };
            for framework in frameworks {
                println!(
                    "{} ({}): {}",
                    framework.display_name(),
                    framework,
                    suggested_models(framework).join(", ")
                );
            }
        }
        Commands::Health => {
            let client = HttpPredictionClient::from_config(&config.service)?;
            match client.health().await {
                Ok(message) => println!("{}: {}", config.service.base(), message),
                Err(e) => {
                    eprintln!("{}: unreachable ({})", config.service.base(), e.kind());
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
