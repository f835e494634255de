use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use professor_feedback::commands::{Command, HELP};
use professor_feedback::session::FeedbackSession;
use professor_feedback::visual::VisualOutput;
use professor_feedback::{App, Config, FeedbackError};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for the interactive UI
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("professor_feedback=info")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();
    colored::control::set_override(config.ui.color);

    let mut app = App::new(&config)?;
    tracing::info!(
        model = %config.relay.model,
        endpoint = %config.relay.endpoint,
        "main: Feedback hub ready"
    );

    println!("{}", VisualOutput::banner(&config.server.name, &config.server.version));
    println!("{}", VisualOutput::stats(&app.stats()));
    println!();
    println!("{}", VisualOutput::professor_list(app.search(), &app.visible()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&app);
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match run_command(&mut app, Command::parse(&line)).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => println!("{}", VisualOutput::error(&e.to_string())),
        }
    }

    tracing::info!("main: Input closed, shutting down");
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

fn prompt(app: &App) {
    use std::io::Write;

    let label = match app.active_session() {
        Some(session) if session.is_composing() => format!("{} (feedback)", surname(&session)),
        Some(session) => surname(&session),
        None => "hub".to_string(),
    };
    print!("{label} › ");
    let _ = std::io::stdout().flush();
}

fn surname(session: &FeedbackSession) -> String {
    session
        .professor()
        .name
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .to_string()
}

async fn run_command(app: &mut App, command: Command) -> Result<Flow, FeedbackError> {
    match command {
        Command::Empty => {}
        Command::Quit => return Ok(Flow::Quit),
        Command::Help => println!("{HELP}"),
        Command::Invalid(usage) => println!("{}", VisualOutput::notice(&usage)),
        Command::List => {
            app.set_search("");
            println!("{}", VisualOutput::professor_list(app.search(), &app.visible()));
        }
        Command::Search(query) => {
            app.set_search(&query);
            println!("{}", VisualOutput::professor_list(app.search(), &app.visible()));
        }
        Command::Stats => println!("{}", VisualOutput::stats(&app.stats())),
        Command::Open(id) => {
            println!("{}", VisualOutput::notice("Fetching anonymous feedback..."));
            let session = app.open_session(id).await?;
            println!("{}", VisualOutput::session_header(&session));
            if let Some(reply) = session.transcript().last() {
                println!("{}", VisualOutput::message(reply));
            }
        }
        Command::Ask(text) => {
            let reply = app.ask_session(&text).await?;
            println!("{}", VisualOutput::message(&reply));
        }
        Command::Text(text) => {
            // Bare text goes to the open session, or to the general panel
            if app.active_session().is_some() {
                let reply = app.ask_session(&text).await?;
                println!("{}", VisualOutput::message(&reply));
            } else {
                let answer = app.ask_general(&text).await?;
                println!("{}", VisualOutput::panel_answer(&answer));
            }
        }
        Command::General(text) => {
            let answer = app.ask_general(&text).await?;
            println!("{}", VisualOutput::panel_answer(&answer));
        }
        Command::Feedback => {
            let session = require_session(app)?;
            session.open_draft()?;
            if let Some(draft) = session.draft() {
                println!("{}", VisualOutput::draft(&draft));
            }
        }
        Command::Rate(stars) => {
            let session = require_session(app)?;
            session.set_draft_rating(stars)?;
            if let Some(draft) = session.draft() {
                println!("{}", VisualOutput::draft(&draft));
            }
        }
        Command::Comment(text) => {
            let session = require_session(app)?;
            session.set_draft_comment(&text)?;
            if let Some(draft) = session.draft() {
                println!("{}", VisualOutput::draft(&draft));
            }
        }
        Command::Submit => {
            let session = require_session(app)?;
            let reply = session.submit_draft().await?;
            println!("{}", VisualOutput::message(&reply));
            if let Some(conclusion) = session.latest_conclusion() {
                println!("{}", VisualOutput::conclusion(&conclusion));
            }
        }
        Command::Cancel => {
            require_session(app)?.cancel_draft()?;
            println!("{}", VisualOutput::notice("Feedback form closed"));
        }
        Command::Transcript => {
            let session = require_session(app)?;
            println!("{}", VisualOutput::session_header(&session));
            println!("{}", VisualOutput::transcript(&session.transcript()));
        }
        Command::Close => {
            if app.close_session() {
                println!("{}", VisualOutput::professor_list(app.search(), &app.visible()));
            } else {
                println!("{}", VisualOutput::notice("No session is open"));
            }
        }
    }
    Ok(Flow::Continue)
}

fn require_session(app: &App) -> Result<std::sync::Arc<FeedbackSession>, FeedbackError> {
    app.active_session().ok_or(FeedbackError::NoActiveSession)
}
