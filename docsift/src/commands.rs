use crate::CLAP_STYLING;
use crate::handlers::parse_seed_url;
use clap::{arg, command};
use docsift_core::report::{DEFAULT_FORMAT, DEFAULT_OUTPUT_FILE};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("docsift")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("docsift")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("extract")
                .about(
                    "Crawl a documentation site and extract its product / module / feature \
                hierarchy with a language model.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The documentation URL to start crawling from")
                        .value_parser(parse_seed_url),
                )
                .arg(
                    arg!(--"max-pages" <NUM_PAGES>)
                        .required(false)
                        .help("Maximum number of pages to crawl on the same domain")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("5"),
                )
                .arg(
                    arg!(--"char-budget" <CHARS>)
                        .required(false)
                        .help("Maximum characters of crawled text sent to the model")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("30000"),
                )
                .arg(
                    arg!(--"delay-ms" <MILLIS>)
                        .required(false)
                        .help("Pause between page fetches in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("1000"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Page fetch timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(-m --"model" <MODEL>)
                        .required(false)
                        .help("Gemini model to use (default: $DOCSIFT_MODEL or gemini-2.5-flash)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format printed to the terminal: text, json, markdown")
                        .value_parser(["text", "json", "markdown", "md"])
                        .default_value(DEFAULT_FORMAT),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Where to save the JSON hierarchy")
                        .default_value(DEFAULT_OUTPUT_FILE)
                        .conflicts_with("no-save"),
                )
                .arg(
                    arg!(--"no-save")
                        .required(false)
                        .help("Do not write the JSON hierarchy to disk")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
