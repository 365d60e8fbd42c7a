mod cli;
mod client;
mod commands;
mod console;
mod error;
mod logging;
mod output;

use campus::controller::{ActionRequest, Target};
use campus::{CampusError, Notice};
use clap::Parser;
use cli::Command;
use commands::{act, list, with_record};
use console::run_console;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::DashError;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv(); // load .env if present

    let cli = cli::Cli::parse();

    // The console owns the terminal, so its logs go to the in-app panel.
    let panel = matches!(cli.command, Command::Console(_)).then(logging::LogBuffer::new);
    logging::init(&cli.log_level, panel.clone());

    // Shared cancellation token + signal handlers.
    let cancel = setup_signal_handlers();

    if let Err(e) = run(cli, panel, cancel).await {
        report(&e);
        std::process::exit(e.exit_code());
    }
}

async fn run(
    cli: cli::Cli,
    panel: Option<logging::LogBuffer>,
    cancel: CancellationToken,
) -> Result<(), DashError> {
    let (http, config) = client::create_client(&cli.conn)?;
    let page_size = config.page_size;

    match cli.command {
        Command::List(args) => with_record!(args.screen, list(&http, &args, page_size)),

        Command::Summary(args) => commands::summary(&http, args.screen).await,

        Command::Approve(args) => {
            let request = ActionRequest::Approve { note: args.note };
            let target = Target::One(args.id);
            with_record!(args.screen, act(&http, args.screen, target, request))
        }

        Command::Reject(args) => {
            let request = ActionRequest::Reject {
                reason: args.reason,
                detailed_reason: args.detail,
            };
            let target = Target::One(args.id);
            with_record!(args.screen, act(&http, args.screen, target, request))
        }

        Command::BulkApprove(args) => {
            let request = ActionRequest::Approve { note: args.note };
            let target = Target::Many(args.ids);
            with_record!(args.screen, act(&http, args.screen, target, request))
        }

        Command::BulkReject(args) => {
            let request = ActionRequest::Reject {
                reason: args.reason,
                detailed_reason: None,
            };
            let target = Target::Many(args.ids);
            with_record!(args.screen, act(&http, args.screen, target, request))
        }

        Command::Grade(args) => commands::grade(&http, &args).await,

        Command::Delete(args) => {
            let target = Target::One(args.id);
            with_record!(
                args.screen,
                act(&http, args.screen, target, ActionRequest::Delete)
            )
        }

        Command::Update(args) => {
            let target = Target::One(args.id);
            let request = ActionRequest::Edit { body: args.body };
            with_record!(args.screen, act(&http, args.screen, target, request))
        }

        Command::ExamCreate(args) => commands::create_exam(&http, &args).await,

        Command::CriteriaCreate(args) => commands::create_criteria(&http, &args).await,

        Command::Certificate(args) => {
            commands::certificate(&http, &args.student, &args.criteria).await
        }

        Command::Console(args) => {
            let logs = panel.unwrap_or_default();
            let screen = args.screen;
            with_record!(
                screen,
                run_console(http, screen, page_size, logs, cancel)
            )
        }
    }
}

/// Print a failed command's error the way the console would show it.
fn report(err: &DashError) {
    let notice = match err {
        DashError::Campus(e) => Notice::from_error(e),
        other => Notice::from_error(&CampusError::Config(other.to_string())),
    };
    let _ = output::write_notice(&notice, &mut std::io::stderr().lock());
}

/// Register SIGINT and SIGTERM handlers that trigger the returned token.
fn setup_signal_handlers() -> CancellationToken {
    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("received SIGINT, shutting down");
        cancel_clone.cancel();
    });

    #[cfg(unix)]
    {
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                    info!("received SIGTERM, shutting down");
                    cancel_clone.cancel();
                }
                Err(e) => warn!(error = %e, "failed to register SIGTERM handler"),
            }
        });
    }

    cancel
}
