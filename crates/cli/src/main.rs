use clap::{Parser, Subcommand};
use ng12_cli::{display, interrupt::cancel_on_interrupt, setup};
use ng12_core::{
    cancel_pair, AssessmentOrchestrator, Backend, ChatSessionManager, ClearDecision, HttpBackend,
};

#[derive(Parser)]
#[command(name = "ng12")]
#[command(about = "NG12 cancer risk assessor CLI")]
struct Cli {
    /// Backend base URL (overrides NG12_API_BASE)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check backend health
    Health,
    /// List selectable patients
    Patients,
    /// Run a risk assessment
    Assess {
        /// Patient to assess (defaults to the first listed patient)
        #[arg(long)]
        patient_id: Option<String>,
    },
    /// Ask the guideline assistant one question
    Ask {
        /// The question
        message: String,
        /// Continue an existing session instead of starting a new one
        #[arg(long)]
        session_id: Option<String>,
    },
    /// Print a session's history as recorded by the backend
    History {
        /// Session identifier
        session_id: String,
    },
    /// Clear a session's history
    Clear {
        /// Session identifier
        session_id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup::init_tracing("warn")?;

    let cli = Cli::parse();
    let cfg = setup::client_config(cli.base_url)?;
    let backend = HttpBackend::new(cfg.clone())?;

    let (handle, token) = cancel_pair();

    match cli.command {
        Some(Commands::Health) => match backend.health().await {
            Ok(health) => println!(
                "{}: {}",
                health.service.as_deref().unwrap_or("backend"),
                health.status
            ),
            Err(e) => eprintln!("{}", display::error_banner(&format!("Error: {}", e))),
        },
        Some(Commands::Patients) => {
            let mut orch = AssessmentOrchestrator::new(&backend);
            match cancel_on_interrupt(orch.load_patients(&token), &handle).await {
                Ok(()) => print!("{}", display::patient_list(orch.patients(), None)),
                Err(_) => eprintln!(
                    "{}",
                    display::error_banner(orch.error_message().unwrap_or_default())
                ),
            }
        }
        Some(Commands::Assess { patient_id }) => {
            let mut orch = AssessmentOrchestrator::new(&backend);
            match patient_id {
                Some(id) => orch.select_patient(id),
                None => {
                    if cancel_on_interrupt(orch.load_patients(&token), &handle)
                        .await
                        .is_err()
                    {
                        eprintln!(
                            "{}",
                            display::error_banner(orch.error_message().unwrap_or_default())
                        );
                        return Ok(());
                    }
                }
            }

            eprintln!("{}", display::in_progress("Assessing..."));
            let _ = cancel_on_interrupt(orch.run_assessment(&token), &handle).await;

            match (orch.result(), orch.error_message()) {
                (Some(result), _) => print!("{}", display::assessment(result)),
                (None, Some(msg)) => eprintln!("{}", display::error_banner(msg)),
                (None, None) => eprintln!("Assessment cancelled."),
            }
        }
        Some(Commands::Ask {
            message,
            session_id,
        }) => {
            let mut chat = match session_id {
                Some(id) => ChatSessionManager::resume(&backend, &cfg, &id)?,
                None => ChatSessionManager::new(&backend, &cfg),
            };

            eprintln!("{}", display::in_progress("Thinking..."));
            let _ = cancel_on_interrupt(chat.submit(&message, &token), &handle).await;

            print!("{}", display::transcript(chat.transcript()));
            if let Some(msg) = chat.error_message() {
                eprintln!("{}", display::error_banner(msg));
            }
            println!("Session: {}", chat.session_id());
        }
        Some(Commands::History { session_id }) => {
            let mut chat = ChatSessionManager::resume(&backend, &cfg, &session_id)?;
            match cancel_on_interrupt(chat.resync(&token), &handle).await {
                Ok(()) => print!("{}", display::transcript(chat.transcript())),
                Err(_) => eprintln!(
                    "{}",
                    display::error_banner(chat.error_message().unwrap_or_default())
                ),
            }
        }
        Some(Commands::Clear { session_id, yes }) => {
            let mut chat = ChatSessionManager::resume(&backend, &cfg, &session_id)?;
            let id = *chat.session_id();
            if !yes {
                println!("Refusing to clear {} without --yes", id);
                return Ok(());
            }

            match cancel_on_interrupt(chat.clear(ClearDecision::Confirmed, &token), &handle).await
            {
                Ok(()) => println!("Cleared session {}", id),
                Err(_) => eprintln!(
                    "{}",
                    display::error_banner(chat.error_message().unwrap_or_default())
                ),
            }
        }
        None => {
            println!("Use 'ng12 --help' for commands");
        }
    }

    Ok(())
}
