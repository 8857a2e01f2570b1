use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("activity_board=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let code = match cli::run() {
        cli::RunOutcome::Run(invocation) => cli::execute(invocation).await,
        cli::RunOutcome::Exit(code) => code,
    };
    std::process::exit(code);
}
