use docsift::commands::command_argument_builder;
use docsift::handlers::{handle_extract, print_banner};
use docsift_core::PipelineError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    // Pick up GEMINI_API_KEY and friends from a local .env, if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    match chosen_command.subcommand() {
        Some(("extract", sub_matches)) => {
            if let Err(e) = handle_extract(sub_matches, quiet).await {
                // Empty crawl / empty extraction were already shown by the reporter
                let already_reported = matches!(
                    e.downcast_ref::<PipelineError>(),
                    Some(PipelineError::EmptyCrawl | PipelineError::EmptyExtraction)
                );
                if !already_reported {
                    eprintln!("✗ {:#}", e);
                }
                std::process::exit(1);
            }
        }
        // No subcommand provided, just show the banner
        None => {}
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
