use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use ng12_cli::interrupt::{self, cancel_on_interrupt};
use ng12_cli::{display, setup};
use ng12_core::{
    AssessmentOrchestrator, Backend, CLEAR_CHAT_PROMPT, ChatSessionManager, ClearDecision,
    ClientConfig, HttpBackend, cancel_pair,
};

type Input = Lines<BufReader<Stdin>>;

const HELP: &str = "\
Modes:      :assess  :chat  :quit
Assessment: list | select <patient-id> | deselect | run | reload
Chat:       <message> | /clear | /history
Ctrl-C cancels the request in flight; at the prompt it exits, as do :quit and Ctrl-D.";

/// The active view. Switching drops the previous view's state; a new chat view starts a new
/// session.
enum View<'a> {
    Assessment(AssessmentOrchestrator<&'a HttpBackend>),
    Chat(ChatSessionManager<&'a HttpBackend>),
}

/// Interactive host for the NG12 assessor
///
/// Reads commands line by line from stdin and drives one view at a time. Starts in the
/// assessment view with the patient list loaded.
///
/// # Environment Variables
/// - `NG12_API_BASE`: backend root (default: "http://127.0.0.1:8000")
/// - `NG12_REQUEST_TIMEOUT_SECS`: per-request timeout; unset means none
/// - `NG12_CHAT_TOP_K`: passages requested per chat turn (default: 5)
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup::init_tracing("ng12_run=info")?;

    let cfg = setup::client_config(None)?;
    let backend = HttpBackend::new(cfg.clone())?;

    match backend.health().await {
        Ok(health) if health.is_ok() => tracing::info!("backend at {} is up", cfg.base_url()),
        Ok(health) => tracing::warn!("backend reports status {}", health.status),
        Err(e) => tracing::warn!("backend health check failed: {}", e),
    }

    println!("NG12 Cancer Risk Assessor");
    println!("{}\n", HELP);

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut view = open_assessment(&backend).await;

    loop {
        prompt(&view).await?;
        let Some(line) = interrupt::next_line_or_interrupt(&mut input, interrupt::ctrl_c()).await?
        else {
            println!();
            break;
        };
        let line = line.trim();

        match line {
            ":quit" | ":q" => break,
            ":help" => println!("{}", HELP),
            ":assess" => view = open_assessment(&backend).await,
            ":chat" => view = open_chat(&backend, &cfg),
            _ => match &mut view {
                View::Assessment(orch) => assessment_command(orch, line).await,
                View::Chat(chat) => chat_command(chat, line, &mut input).await?,
            },
        }
    }

    Ok(())
}

async fn prompt(view: &View<'_>) -> anyhow::Result<()> {
    let label = match view {
        View::Assessment(_) => "assess",
        View::Chat(_) => "chat",
    };
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{}> ", label).as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

async fn open_assessment(backend: &HttpBackend) -> View<'_> {
    let mut orch = AssessmentOrchestrator::new(backend);
    load_patients(&mut orch).await;
    View::Assessment(orch)
}

fn open_chat<'a>(backend: &'a HttpBackend, cfg: &ClientConfig) -> View<'a> {
    let chat = ChatSessionManager::new(backend, cfg);
    print!("{}", display::transcript(chat.transcript()));
    View::Chat(chat)
}

async fn load_patients<B: Backend>(orch: &mut AssessmentOrchestrator<B>) {
    let (handle, token) = cancel_pair();
    println!("{}", display::in_progress("Loading patients..."));
    if cancel_on_interrupt(orch.load_patients(&token), &handle)
        .await
        .is_err()
    {
        if let Some(msg) = orch.error_message() {
            println!("{}", display::error_banner(msg));
        }
        return;
    }
    print!(
        "{}",
        display::patient_list(orch.patients(), orch.selected_patient_id())
    );
}

async fn assessment_command<B: Backend>(orch: &mut AssessmentOrchestrator<B>, line: &str) {
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "list" => print!(
            "{}",
            display::patient_list(orch.patients(), orch.selected_patient_id())
        ),
        "reload" => load_patients(orch).await,
        "select" if !arg.is_empty() => {
            orch.select_patient(arg);
            match orch.selected_patient() {
                Some(patient) => println!("{}", display::patient_summary(patient)),
                None => println!("Selected {} (not in the loaded list)", arg),
            }
        }
        "deselect" => orch.clear_selection(),
        "run" => {
            let (handle, token) = cancel_pair();
            println!("{}", display::in_progress("Assessing..."));
            let _ = cancel_on_interrupt(orch.run_assessment(&token), &handle).await;
            match (orch.result(), orch.error_message()) {
                (Some(result), _) => print!("{}", display::assessment(result)),
                (None, Some(msg)) => println!("{}", display::error_banner(msg)),
                (None, None) => println!("Assessment cancelled."),
            }
        }
        _ => println!("Unknown command. Type :help for commands."),
    }
}

async fn chat_command<B: Backend>(
    chat: &mut ChatSessionManager<B>,
    line: &str,
    input: &mut Input,
) -> anyhow::Result<()> {
    let (handle, token) = cancel_pair();

    let outcome = match line {
        "" => Ok(()),
        "/clear" => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(format!("{} [y/N] ", CLEAR_CHAT_PROMPT).as_bytes())
                .await?;
            stdout.flush().await?;

            let answer = input.next_line().await?.unwrap_or_default();
            let decision = match answer.trim() {
                "y" | "Y" | "yes" => ClearDecision::Confirmed,
                _ => ClearDecision::Declined,
            };
            let outcome = cancel_on_interrupt(chat.clear(decision, &token), &handle).await;
            if decision == ClearDecision::Confirmed {
                print!("{}", display::transcript(chat.transcript()));
            }
            outcome
        }
        "/history" => {
            println!("{}", display::in_progress("Loading history..."));
            let outcome = cancel_on_interrupt(chat.resync(&token), &handle).await;
            if outcome.is_ok() {
                print!("{}", display::transcript(chat.transcript()));
            }
            outcome
        }
        message => {
            println!("{}", display::in_progress("Thinking..."));
            let outcome = cancel_on_interrupt(chat.submit(message, &token), &handle).await;
            // The user turn is already on screen as typed.
            if outcome.is_ok() {
                if let Some(reply) = chat.transcript().last() {
                    print!("{}", display::chat_message(reply));
                }
            }
            outcome
        }
    };

    if outcome.is_err() {
        if let Some(msg) = chat.error_message() {
            println!("{}", display::error_banner(msg));
        }
    }
    Ok(())
}
