use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use medfolio_lib::capture::load_image_file;
use medfolio_lib::commands::records::{add_record, analyze_record};
use medfolio_lib::commands::scan::identify_medication;
use medfolio_lib::commands::summary::generate_summary_async;
use medfolio_lib::commands::{check_ai_status, CommandError};
use medfolio_lib::config::AiSettings;
use medfolio_lib::core_state::AppState;
use medfolio_lib::form::NewRecordForm;
use medfolio_lib::models::{parse_record_date, MedicationStatus, RecordCategory};
use medfolio_lib::pipeline::structuring::{HealthAssistant, OllamaClient};
use medfolio_lib::pipeline::summary::parse_summary;
use medfolio_lib::records::RecordStore;

#[derive(Parser)]
#[command(name = "medfolio", version)]
#[command(about = "Personal health records with AI summaries and photo analysis")]
struct Cli {
    /// Ollama base URL (overrides MEDFOLIO_OLLAMA_URL)
    #[arg(long, global = true)]
    ollama_url: Option<String>,

    /// Model name (overrides MEDFOLIO_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Request timeout in seconds (overrides MEDFOLIO_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a summary response and print the document as JSON
    Parse {
        /// Response file, or "-" for stdin
        input: String,
    },
    /// List the demo records, or category counts when no category is given
    Records {
        #[arg(long)]
        category: Option<RecordCategory>,
        /// Medication tab: current or past
        #[arg(long)]
        tab: Option<MedicationStatus>,
    },
    /// Check that the model server is reachable and the model is installed
    Status,
    /// Generate a health summary of the demo records (Ctrl-C cancels)
    Summary,
    /// Identify a medication from a package photo
    Identify {
        image: PathBuf,
    },
    /// Add a record from a photo and refine its description with the model
    Analyze {
        image: PathBuf,
        #[arg(long, default_value = "lab_result")]
        category: RecordCategory,
        #[arg(long, default_value = "")]
        title: String,
        /// Record date, YYYY-MM-DD (defaults to today)
        #[arg(long, value_parser = parse_record_date)]
        date: Option<NaiveDate>,
    },
}

impl Cli {
    fn ai_settings(&self) -> AiSettings {
        let mut settings = AiSettings::from_env();
        if let Some(url) = &self.ollama_url {
            settings.base_url = url.clone();
        }
        if let Some(model) = &self.model {
            settings.model = model.clone();
        }
        if let Some(secs) = self.timeout.filter(|s| *s > 0) {
            settings.timeout_secs = secs;
        }
        settings
    }
}

fn main() -> Result<()> {
    medfolio_lib::init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Parse { input } => {
            let text = read_input(input)?;
            print_json(&parse_summary(&text))
        }
        Commands::Records { category, tab } => {
            let store = RecordStore::with_samples();
            match category {
                Some(category) => print_json(&store.list(*category, *tab)),
                None => print_json(&store.category_counts()),
            }
        }
        Commands::Status => {
            let assistant = build_assistant(&cli)?;
            print_json(&check_ai_status(&assistant))
        }
        Commands::Summary => {
            let assistant = Arc::new(build_assistant(&cli)?);
            run_summary(Arc::clone(&assistant))
        }
        Commands::Identify { image } => {
            let assistant = build_assistant(&cli)?;
            let mut form = NewRecordForm::default();
            form.quick_scan();
            form.attach_image(load_image_file(image).context("Failed to load image")?);
            let identification = identify_medication(&assistant, &mut form).map_err(report)?;
            print_json(&identification)
        }
        Commands::Analyze {
            image,
            category,
            title,
            date,
        } => {
            let assistant = build_assistant(&cli)?;
            let mut state = AppState::with_samples();
            state.form.category = *category;
            state.form.title = title.clone();
            if let Some(date) = date {
                state.form.date = *date;
            }
            state.form.attach_image(load_image_file(image).context("Failed to load image")?);
            let id = add_record(&mut state).id;
            let record = analyze_record(&assistant, &mut state, id).map_err(report)?;
            print_json(&record)
        }
    }
}

/// The blocking HTTP client is created and dropped outside the async runtime.
fn build_assistant(cli: &Cli) -> Result<HealthAssistant> {
    let settings = cli.ai_settings();
    tracing::info!(
        base_url = %settings.base_url,
        model = %settings.model,
        timeout_secs = settings.timeout_secs,
        "AI settings resolved"
    );
    let client = OllamaClient::from_settings(&settings).context("Failed to build Ollama client")?;
    Ok(HealthAssistant::new(Arc::new(client), &settings.model))
}

fn run_summary(assistant: Arc<HealthAssistant>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let records = RecordStore::with_samples().all().to_vec();
    let outcome = runtime.block_on(async {
        tokio::select! {
            summary = generate_summary_async(assistant, records) => summary,
            _ = tokio::signal::ctrl_c() => Err(CommandError::Cancelled),
        }
    });

    // A cancelled request may still be in flight on the blocking pool.
    runtime.shutdown_background();

    print_json(&outcome.map_err(report)?)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report(e: CommandError) -> anyhow::Error {
    let message = e.user_message();
    anyhow::Error::new(e).context(message)
}
