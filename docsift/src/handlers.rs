use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use docsift_core::extract::DEFAULT_CHAR_BUDGET;
use docsift_core::report::{self, DEFAULT_FORMAT, OUTPUT_MIME};
use docsift_core::{
    run_pipeline, Config, ExtractorConfig, GeminiClient, HierarchyExtractor, OutputFormat,
};
use docsift_scanner::crawler::{DEFAULT_DELAY, DEFAULT_MAX_PAGES, DEFAULT_TIMEOUT};
use docsift_scanner::{Crawler, CrawlerConfig, ProgressReporter};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Everything `docsift extract` needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub url: Url,
    pub max_pages: usize,
    pub char_budget: usize,
    pub delay: Duration,
    pub timeout: Duration,
    pub model: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub quiet: bool,
}

/// Parse a seed URL, trying to add https:// if needed
pub fn parse_seed_url(line: &str) -> Result<Url, String> {
    let line = line.trim();
    if line.is_empty() {
        return Err("Please provide a URL.".to_string());
    }

    let parsed = match Url::parse(line) {
        Ok(url) => url,
        Err(_) => Url::parse(&format!("https://{}", line))
            .map_err(|e| format!("Invalid URL '{}': {}", line, e))?,
    };

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        _ => Err(format!("Unsupported URL '{}': expected an http(s) address", line)),
    }
}

/// Expand `~` in a user-supplied output path.
pub fn resolve_output_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

pub fn extract_options_from_matches(
    sub_matches: &ArgMatches,
    quiet: bool,
) -> Result<ExtractOptions, String> {
    let url = sub_matches
        .get_one::<Url>("url")
        .cloned()
        .ok_or_else(|| "Please provide a URL.".to_string())?;
    let max_pages = sub_matches
        .get_one::<usize>("max-pages")
        .copied()
        .unwrap_or(DEFAULT_MAX_PAGES);
    let char_budget = sub_matches
        .get_one::<usize>("char-budget")
        .copied()
        .unwrap_or(DEFAULT_CHAR_BUDGET);
    let delay = sub_matches
        .get_one::<u64>("delay-ms")
        .map(|ms| Duration::from_millis(*ms))
        .unwrap_or(DEFAULT_DELAY);
    let timeout = sub_matches
        .get_one::<u64>("timeout")
        .map(|secs| Duration::from_secs(*secs))
        .unwrap_or(DEFAULT_TIMEOUT);
    let model = sub_matches.get_one::<String>("model").cloned();

    let format_name = sub_matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or(DEFAULT_FORMAT);
    let format = OutputFormat::from_str(format_name)
        .ok_or_else(|| format!("Unknown output format '{}'", format_name))?;

    let output = if sub_matches.get_flag("no-save") {
        None
    } else {
        sub_matches
            .get_one::<String>("output")
            .map(|raw| resolve_output_path(raw))
    };

    if max_pages == 0 {
        return Err("--max-pages must be at least 1".to_string());
    }

    Ok(ExtractOptions {
        url,
        max_pages,
        char_budget,
        delay,
        timeout,
        model,
        format,
        output,
        quiet,
    })
}

/// Terminal progress: an indicatif bar for crawl progress plus colored
/// warnings and errors. In quiet mode the bar is hidden but warnings and
/// errors still reach stderr.
pub struct ConsoleReporter {
    bar: ProgressBar,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(100);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos:>3}% {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };

        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn print(&self, line: String) {
        if self.bar.is_hidden() {
            eprintln!("{}", line);
        } else {
            self.bar.println(line);
        }
    }
}

pub fn warning_line(message: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), message.yellow())
}

pub fn error_line(message: &str) -> String {
    format!("{} {}", "✗".red().bold(), message.red())
}

impl ProgressReporter for ConsoleReporter {
    fn on_progress(&self, fraction: f64) {
        self.bar
            .set_position((fraction.clamp(0.0, 1.0) * 100.0).round() as u64);
    }

    fn on_status(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn on_warning(&self, message: &str) {
        self.print(warning_line(message));
    }

    fn on_error(&self, message: &str) {
        self.print(error_line(message));
    }
}

pub fn print_banner() {
    println!(
        "{} {}",
        "docsift".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").bright_white()
    );
    println!(
        "{}",
        "Map a product's modules and features from its documentation.".blue()
    );
    println!();
}

pub async fn handle_extract(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let options = extract_options_from_matches(sub_matches, quiet).map_err(anyhow::Error::msg)?;
    debug!(?options, "Resolved extract options");

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(ref model) = options.model {
        config = config.with_model(model.clone());
    }

    if !options.quiet {
        let host = options.url.host_str().unwrap_or("unknown");
        println!("🕷️  Crawling {}", host.bright_white());
        println!("Max pages: {}", options.max_pages);
        println!("Model: {}\n", config.model);
    }

    let console = Arc::new(ConsoleReporter::new(options.quiet));
    let reporter: Arc<dyn ProgressReporter> = console.clone();

    let crawler_config = CrawlerConfig::default()
        .with_max_pages(options.max_pages)
        .with_delay(options.delay)
        .with_timeout(options.timeout);
    let crawler = Crawler::with_config(crawler_config)
        .context("Failed to create HTTP client")?
        .with_reporter(reporter.clone());

    let client = GeminiClient::new(&config).context("Failed to create Gemini client")?;
    let extractor = HierarchyExtractor::new(client)
        .with_config(ExtractorConfig::default().with_char_budget(options.char_budget))
        .with_reporter(reporter.clone());

    let outcome = run_pipeline(&crawler, &extractor, options.url.as_str(), reporter.as_ref()).await;
    console.finish();
    let result = outcome?;

    if !options.quiet {
        println!("{} Extraction completed successfully!\n", "✓".green().bold());
    }

    let rendered = report::render(&result, options.format).context("Failed to render report")?;
    println!("{}", rendered);

    if let Some(ref path) = options.output {
        let json = report::to_json(&result).context("Failed to serialize hierarchy")?;
        report::save_report(&json, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        if !options.quiet {
            println!(
                "{} Saved {} ({})",
                "📥".bold(),
                path.display().to_string().bright_white(),
                OUTPUT_MIME
            );
        }
    }

    Ok(())
}
