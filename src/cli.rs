use activity_board::{BoardConfig, RemovalOutcome, RenderOutcome, SignupOutcome};
use clap::{Parser, Subcommand};
use std::time::Duration;
use url::Url;

pub(crate) enum RunOutcome {
    Run(Invocation),
    Exit(i32),
}

pub(crate) struct Invocation {
    config: BoardConfig,
    command: Command,
}

pub(crate) fn run() -> RunOutcome {
    let cli = Cli::parse();
    match resolve_config(&cli) {
        Ok(config) => RunOutcome::Run(Invocation {
            config,
            command: cli.command,
        }),
        Err(err) => {
            eprintln!("error: {err}");
            RunOutcome::Exit(2)
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "activity-board",
    version,
    about = "Browse activities, sign up and remove participants"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[arg(long, env = "ACTIVITY_BOARD_BASE_URL")]
    base_url: Option<String>,
    #[arg(long, env = "ACTIVITY_BOARD_MESSAGE_TIMEOUT")]
    message_timeout: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the activity list.
    List {
        /// Print the whole page instead of the list region.
        #[arg(long)]
        page: bool,
    },
    /// Submit the signup form.
    Signup {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
    },
    /// Press the delete button next to a participant.
    Remove {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

pub(crate) async fn execute(invocation: Invocation) -> i32 {
    let Invocation { config, command } = invocation;
    let assume_yes = matches!(command, Command::Remove { yes: true, .. });
    let board = match activity_board::terminal_board(config, assume_yes) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("error: {err}");
            return 2;
        }
    };

    match command {
        Command::List { page } => {
            let outcome = board.load().await;
            let snapshot = board.page();
            let html = if page {
                snapshot.to_html()
            } else {
                snapshot.list_html()
            };
            match html {
                Ok(html) => println!("{html}"),
                Err(err) => {
                    eprintln!("failed to render page: {err}");
                    return 1;
                }
            }
            match outcome {
                RenderOutcome::Rendered { .. } => 0,
                RenderOutcome::Failed | RenderOutcome::Superseded => 1,
            }
        }
        Command::Signup { activity, email } => {
            board.load().await;
            board.edit_page(|page| {
                page.signup_form.email = email;
                page.signup_form.activity = activity;
            });
            let outcome = board.submit_signup().await;
            let message = board.page().message.text;
            match outcome {
                SignupOutcome::Accepted => {
                    println!("{message}");
                    0
                }
                SignupOutcome::Rejected | SignupOutcome::Failed => {
                    eprintln!("{message}");
                    1
                }
            }
        }
        Command::Remove {
            activity, email, ..
        } => {
            board.load().await;
            let Some(control) = board.page().delete_control(&activity, &email).cloned() else {
                eprintln!("error: {email} is not listed under {activity}");
                return 1;
            };
            match board.remove_participant(&control).await {
                RemovalOutcome::Removed => {
                    println!("Removed {email} from {activity}");
                    0
                }
                RemovalOutcome::Declined | RemovalOutcome::Skipped => 0,
                RemovalOutcome::Failed { .. } => 1,
            }
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<BoardConfig, String> {
    let mut config = BoardConfig::default();
    if let Some(raw) = cli.base_url.as_deref() {
        config.base_url = parse_base_url(raw)?;
    }
    if let Some(raw) = cli.message_timeout.as_deref() {
        config.message_timeout = parse_message_timeout(raw)?;
    }
    Ok(config)
}

fn parse_base_url(raw: &str) -> Result<Url, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err("base url cannot be empty".to_string());
    }
    let url = Url::parse(value).map_err(|err| format!("invalid base url '{value}': {err}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(format!(
            "invalid base url '{value}'; unsupported scheme '{scheme}'"
        )),
    }
}

fn parse_message_timeout(raw: &str) -> Result<Duration, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err("message timeout cannot be empty".to_string());
    }

    let split = value
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(value.len());
    let (amount, unit) = value.split_at(split);

    let amount: u64 = amount.parse().map_err(|_| {
        format!("invalid message timeout '{value}'; expected <number>[ms|s|m]")
    })?;

    if amount == 0 {
        return Err("message timeout must be greater than 0".to_string());
    }

    match unit.to_ascii_lowercase().as_str() {
        "ms" => Ok(Duration::from_millis(amount)),
        "" | "s" => Ok(Duration::from_secs(amount)),
        "m" => Ok(Duration::from_secs(amount * 60)),
        _ => Err(format!(
            "invalid message timeout '{value}'; expected <number>[ms|s|m]"
        )),
    }
}
