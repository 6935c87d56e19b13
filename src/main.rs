// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use clap::{ArgAction, Args, Parser, Subcommand};
use clinician_assist::filter::{PatientQuery, StatusFilter, load_patients};
use clinician_assist::render::{self, ViewMode};
use clinician_assist::utils::logging::{format_heading, format_info, format_warning};
use clinician_assist::{
    BackendClient, BackendResponder, ChatResponder, ChatSession, Config, DataSource,
    DispatchOutcome, ExportedResults, FilterState, HealthCheck, HealthReport, JsonExporter,
    OperationTimer, QueryDispatcher, RequestSpinner, SimulatedResponder, TimeRange,
    Validator, apply_filters,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "clinician_assist")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Terminal client for a clinician AI search and chat backend", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the backend and filter the returned results
    Search(SearchArgs),

    /// Interactive chat with the assistant; `/quit` to leave
    Chat {
        #[arg(long)]
        simulate: bool,

        #[arg(long, value_name = "ID")]
        clinician: Option<String>,
    },

    /// Send a single chat message and print the reply
    Ask {
        message: String,

        #[arg(long)]
        simulate: bool,

        #[arg(long, value_name = "ID")]
        clinician: Option<String>,
    },

    /// Filter a local patient directory
    Patients {
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        #[arg(short, long, default_value = "")]
        query: String,

        #[arg(short, long, default_value = "all")]
        status: StatusFilter,
    },

    /// Find patients similar to a free-text description
    Similar { text: String },

    /// Ask the backend to summarize free text
    Summarize { text: String },

    /// Insert a patient record into the backend's index
    AddPatient {
        #[arg(long)]
        id: String,

        #[arg(long)]
        text: String,

        /// JSON object with patient metadata
        #[arg(long)]
        metadata: String,
    },

    /// Check that the backend is reachable
    Health,
}

#[derive(Args)]
struct SearchArgs {
    /// One or more queries; several are sent at once and the last reply wins
    #[arg(required = true)]
    queries: Vec<String>,

    /// Restrict to these sources (ehr, lab, imaging, notes); repeatable
    #[arg(long = "source", value_name = "SOURCE")]
    sources: Vec<String>,

    #[arg(long, value_name = "RANGE")]
    time_range: Option<TimeRange>,

    #[arg(long, value_name = "PERCENT")]
    min_confidence: Option<f32>,

    /// Local text filter on title and description; replaces the time window
    #[arg(long = "match", value_name = "TEXT")]
    match_text: Option<String>,

    #[arg(long, default_value = "list")]
    view: ViewMode,

    #[arg(long, value_name = "ID")]
    clinician: Option<String>,

    /// Similarity threshold forwarded to the backend (0.0 - 1.0)
    #[arg(long, value_name = "THRESHOLD")]
    similarity: Option<f32>,

    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    clinician_assist::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Search(args) => {
            // the failure was already reported as a notification
            if !cmd_search(&config, args).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Chat {
            simulate,
            clinician,
        } => {
            cmd_chat(&config, simulate, clinician).await?;
        }
        Commands::Ask {
            message,
            simulate,
            clinician,
        } => {
            cmd_ask(&config, &message, simulate, clinician).await?;
        }
        Commands::Patients {
            file,
            query,
            status,
        } => {
            cmd_patients(file, query, status)?;
        }
        Commands::Similar { text } => {
            cmd_similar(&config, &text).await?;
        }
        Commands::Summarize { text } => {
            cmd_summarize(&config, &text).await?;
        }
        Commands::AddPatient { id, text, metadata } => {
            cmd_add_patient(&config, &id, &text, &metadata).await?;
        }
        Commands::Health => {
            cmd_health(&config).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

const SLOW_PING: Duration = Duration::from_secs(2);

fn spinner(message: &str) -> RequestSpinner {
    if std::io::stderr().is_terminal() {
        RequestSpinner::start(message)
    } else {
        RequestSpinner::hidden()
    }
}

fn backend_client(config: &Config) -> Result<Arc<BackendClient>> {
    let client = BackendClient::new(&config.backend).context("Failed to create backend client")?;
    Ok(Arc::new(client))
}

fn build_filters(config: &Config, args: &SearchArgs) -> Result<FilterState> {
    let mut filters = FilterState {
        sources: config.search.sources,
        time_range: config.search.time_range,
        min_confidence: config.search.min_confidence,
    };

    if !args.sources.is_empty() {
        let parsed = args
            .sources
            .iter()
            .map(|key| {
                DataSource::from_key(key).ok_or_else(|| {
                    anyhow!(
                        "Unknown source '{}' (expected one of: {})",
                        key,
                        DataSource::known_keys()
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;
        for source in DataSource::KNOWN.iter() {
            filters.toggle_source(source, parsed.contains(source));
        }
    }

    if let Some(time_range) = args.time_range {
        filters.set_time_range(time_range);
    }

    if let Some(min_confidence) = args.min_confidence {
        Validator::validate_confidence(min_confidence)?;
        filters.set_min_confidence(min_confidence);
    }

    Ok(filters)
}

/// Returns `false` when every query that was sent failed.
async fn cmd_search(config: &Config, args: SearchArgs) -> Result<bool> {
    let filters = build_filters(config, &args)?;
    let client = backend_client(config)?;

    let mut dispatcher = QueryDispatcher::from_config(client, config);
    if let Some(clinician) = &args.clinician {
        Validator::validate_clinician_id(clinician)?;
        dispatcher = dispatcher.with_clinician(clinician.clone());
    }
    if let Some(threshold) = args.similarity {
        Validator::validate_similarity_threshold(threshold)?;
        dispatcher = dispatcher.with_similarity_threshold(threshold);
    }

    let progress = spinner("Searching...");
    let outcomes = match args.queries.as_slice() {
        [query] => vec![(query.clone(), dispatcher.dispatch(query).await)],
        queries => dispatcher.dispatch_all(queries).await,
    };
    progress.finish();

    for notification in dispatcher.take_notifications() {
        eprintln!("{}", notification.render());
    }

    if outcomes
        .iter()
        .all(|(_, outcome)| *outcome == DispatchOutcome::Skipped)
    {
        println!(
            "{}",
            format_warning(&format!(
                "Queries must be at least {} characters long",
                config.search.min_query_chars
            ))
        );
        return Ok(true);
    }

    let Some(batch) = dispatcher.batch() else {
        return Ok(false);
    };

    let shown = apply_filters(&batch.results, &filters, args.match_text.as_deref(), Utc::now());
    info!(
        "Showing {} of {} fetched results",
        shown.len(),
        batch.results.len()
    );

    println!("\n{}\n", format_heading(&format!("Search Results for: \"{}\"", batch.query)));
    if let Some(answer) = &batch.answer {
        println!("{}\n", answer);
    }
    print!(
        "{}",
        render::render_results(
            &shown,
            args.view,
            config.output.preview_chars,
            config.output.graph_width
        )
    );

    if shown.is_empty() && !batch.results.is_empty() {
        println!(
            "{}",
            format_info("All results are hidden by the current filters; try --time-range all or a lower --min-confidence")
        );
    }

    if let Some(dir) = args.export {
        let exporter = JsonExporter::new(dir)?;
        let manifest = exporter.export_results(
            &ExportedResults {
                query: &batch.query,
                answer: batch.answer.as_deref(),
                filters: &filters,
                results: &shown,
            },
            args.pretty,
        )?;
        println!(
            "{}",
            format_info(&format!(
                "Exported {} results to {}",
                manifest.total_results,
                exporter.output_dir().join(&manifest.files[0]).display()
            ))
        );
    }

    Ok(true)
}

fn resolve_clinician(config: &Config, flag: Option<String>, simulate: bool) -> Result<String> {
    let clinician = match flag.or_else(|| config.backend.clinician_id.clone()) {
        Some(id) => id,
        None if simulate => "local".to_string(),
        None => {
            return Err(anyhow!(
                "A clinician id is required for chat; set backend.clinician_id or pass --clinician"
            ));
        }
    };
    Validator::validate_clinician_id(&clinician)?;
    Ok(clinician)
}

async fn cmd_chat(config: &Config, simulate: bool, clinician: Option<String>) -> Result<()> {
    let simulate = simulate || config.chat.simulate;
    let clinician = resolve_clinician(config, clinician, simulate)?;

    if simulate {
        let responder =
            SimulatedResponder::new(Duration::from_millis(config.chat.simulated_delay_ms));
        run_chat(config, ChatSession::new(responder, clinician)).await
    } else {
        let responder = BackendResponder::new(backend_client(config)?);
        run_chat(config, ChatSession::new(responder, clinician)).await
    }
}

async fn run_chat<R: ChatResponder>(config: &Config, session: ChatSession<R>) -> Result<()> {
    let mut session = match &config.chat.greeting {
        Some(greeting) => session.with_greeting(greeting.clone()),
        None => session,
    };

    if !session.is_empty() {
        println!("{}", render::render_transcript(session.messages()));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read from stdin")? {
        let trimmed = line.trim();
        if trimmed == "/quit" || trimmed == "/exit" {
            break;
        }

        let before = session.len();
        let progress = spinner("Thinking...");
        session.send(&line).await;
        progress.finish();

        // skip the echoed user message
        for message in session.messages().iter().skip(before + 1) {
            println!("{}", render::render_message(message));
        }
    }

    info!("Chat ended after {} messages", session.len());
    Ok(())
}

async fn cmd_ask(
    config: &Config,
    message: &str,
    simulate: bool,
    clinician: Option<String>,
) -> Result<()> {
    Validator::validate_content_not_empty(message)?;
    let simulate = simulate || config.chat.simulate;
    let clinician = resolve_clinician(config, clinician, simulate)?;

    let transcript = if simulate {
        let responder =
            SimulatedResponder::new(Duration::from_millis(config.chat.simulated_delay_ms));
        let mut session = ChatSession::new(responder, clinician);
        let progress = spinner("Thinking...");
        session.send(message).await;
        progress.finish();
        session.messages().to_vec()
    } else {
        let mut session =
            ChatSession::new(BackendResponder::new(backend_client(config)?), clinician);
        let progress = spinner("Thinking...");
        session.send(message).await;
        progress.finish();
        session.messages().to_vec()
    };

    for reply in transcript.iter().skip(1) {
        println!("{}", render::render_message(reply));
    }
    Ok(())
}

fn cmd_patients(file: PathBuf, query: String, status: StatusFilter) -> Result<()> {
    let patients = load_patients(&file)
        .with_context(|| format!("Failed to load patients from {}", file.display()))?;

    let filter = PatientQuery::new(query, status);
    let shown = filter.apply(&patients);
    print!("{}", render::render_patients(&shown, patients.len()));
    Ok(())
}

async fn cmd_similar(config: &Config, text: &str) -> Result<()> {
    let client = backend_client(config)?;

    let progress = spinner("Finding similar patients...");
    let results = client.search_similar(text).await;
    progress.finish();

    let results = results.context("Similar patient search failed")?;
    let shown: Vec<_> = results.iter().collect();
    print!(
        "{}",
        render::render_results(
            &shown,
            ViewMode::List,
            config.output.preview_chars,
            config.output.graph_width
        )
    );
    Ok(())
}

async fn cmd_summarize(config: &Config, text: &str) -> Result<()> {
    Validator::validate_content_not_empty(text)?;
    let client = backend_client(config)?;

    let progress = spinner("Summarizing...");
    let summary = client
        .generate_summary(serde_json::Value::String(text.to_string()))
        .await;
    progress.finish();

    println!("{}", summary.context("Summary request failed")?);
    Ok(())
}

async fn cmd_add_patient(config: &Config, id: &str, text: &str, metadata: &str) -> Result<()> {
    let metadata = Validator::parse_metadata(metadata)?;
    let client = backend_client(config)?;

    let message = client
        .insert_patient(id, text, metadata)
        .await
        .context("Failed to insert patient record")?;
    println!("{}", clinician_assist::utils::logging::format_success(&message));
    Ok(())
}

async fn cmd_health(config: &Config) -> Result<()> {
    let client = backend_client(config)?;

    let timer = OperationTimer::new("GET /");
    let outcome = client.ping().await;
    let check = HealthCheck::from_ping("backend", outcome, timer.finish(), SLOW_PING);

    let report = HealthReport::new(client.base_url(), vec![check]);
    print!("{}", report.format());
    Ok(())
}
