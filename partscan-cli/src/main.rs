//! partscan CLI
//!
//! Command-line interface for the part-code lookup and scan pipeline.

use std::io::{BufReader, Write};
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use partscan_core::{Catalog, LookupResult};
use partscan_feed::{FeedClient, FeedConfig};
use partscan_scanner::{
    DecodeEngine, LineEngine, Presenter, ScanSession, StabilizerConfig, drain, run_session,
};

mod output;
use output::TerminalPresenter;

#[derive(Parser)]
#[command(name = "partscan")]
#[command(about = "Look up part support info by scanned or typed code", long_about = None)]
struct Cli {
    /// Spreadsheet id override for the part feed
    #[arg(long, global = true)]
    sheet_id: Option<String>,

    /// Sheet name override for the part feed
    #[arg(long, global = true)]
    sheet_name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the part feed and print catalog stats
    Fetch,

    /// Look up a single part code (manual entry path)
    Lookup {
        /// Raw code; normalized before lookup
        code: String,
    },

    /// Read codes from line input until one is confirmed
    Scan {
        /// Consecutive identical reads required to confirm a code
        #[arg(long, default_value_t = 1)]
        threshold: u32,

        /// Debounce window between accepted reads, in milliseconds
        #[arg(long = "debounce-ms", default_value_t = 100)]
        debounce_ms: u64,

        /// Exit after the first confirmed code
        #[arg(long)]
        once: bool,
    },

    /// Manage feed configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current feed settings and their sources
    Show,

    /// Interactively set up the feed config file
    Setup,

    /// Print the config file path
    Path,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let config = FeedConfig::load().with_overrides(cli.sheet_id, cli.sheet_name);

    match cli.command {
        Commands::Fetch => run_fetch(config),
        Commands::Lookup { code } => run_lookup(config, &code),
        Commands::Scan {
            threshold,
            debounce_ms,
            once,
        } => run_scan(config, threshold, debounce_ms, once),
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(),
            ConfigAction::Setup => run_config_setup(),
            ConfigAction::Path => run_config_path(),
        },
    }
}

/// Fetch the catalog once, with a spinner. Any feed error is reported and
/// yields `None` — the catalog stays empty for this run, no retry.
fn load_catalog(config: FeedConfig) -> Option<Catalog> {
    let client = match FeedClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!(
                "{} Failed to set up feed client: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            return None;
        }
    };

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("/-\\|"),
    );
    pb.set_message("Loading part feed...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = rt.block_on(client.fetch_catalog());
    pb.finish_and_clear();

    match result {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            eprintln!(
                "{} Error loading part feed: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            None
        }
    }
}

/// Run the fetch command.
fn run_fetch(config: FeedConfig) {
    println!(
        "Feed: {}",
        config.url().if_supports_color(Stdout, |t| t.cyan()),
    );

    let Some(catalog) = load_catalog(config) else {
        std::process::exit(1);
    };

    println!(
        "{} {} part codes loaded",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        catalog.len(),
    );
    println!(
        "  {}",
        format!(
            "Updated: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )
        .if_supports_color(Stdout, |t| t.dimmed()),
    );
}

/// Run the lookup command: the manual entry path, no stabilizer.
fn run_lookup(config: FeedConfig, code: &str) {
    let Some(catalog) = load_catalog(config) else {
        std::process::exit(1);
    };

    let mut presenter = TerminalPresenter::new();
    match catalog.lookup(code) {
        LookupResult::Match { code, record } => {
            presenter.show_match(&code, &record);
        }
        LookupResult::NotFound { code } => {
            presenter.show_not_found(&code);
            std::process::exit(1);
        }
    }
}

/// Run the scan command: sessions over line input until it ends.
fn run_scan(config: FeedConfig, threshold: u32, debounce_ms: u64, once: bool) {
    let Some(catalog) = load_catalog(config) else {
        std::process::exit(1);
    };

    let mut presenter = TerminalPresenter::new();
    presenter.load_status(&format!(
        "Catalog loaded: {} part codes ({})",
        catalog.len(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
    ));
    if catalog.is_empty() {
        eprintln!(
            "{} Catalog is empty; no code can be confirmed",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
        );
    }

    let stabilizer = StabilizerConfig {
        debounce: Duration::from_millis(debounce_ms),
        stability_threshold: threshold.max(1),
    };

    let mut engine = LineEngine::new(BufReader::new(std::io::stdin()));
    let events = match engine.start() {
        Ok(events) => events,
        Err(e) => {
            eprintln!(
                "{} {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            std::process::exit(1);
        }
    };

    let mut session = ScanSession::new(stabilizer);
    let mut confirmed_count = 0usize;

    loop {
        let confirmed = run_session(&events, &mut session, &catalog, &mut presenter);
        let Some(code) = confirmed else {
            // Input ended before a confirmation.
            break;
        };
        log::info!("confirmed {code}");
        confirmed_count += 1;

        if once {
            break;
        }

        // Rescan: back to Idle, discard reads that landed in between.
        session.reset();
        drain(&events);
    }

    engine.stop();

    println!();
    println!(
        "{} {} code{} confirmed",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        confirmed_count,
        if confirmed_count == 1 { "" } else { "s" },
    );
    if confirmed_count == 0 {
        std::process::exit(1);
    }
}

// -- Config subcommands --

/// Show current feed settings and their sources.
fn run_config_show() {
    let path = partscan_feed::config_path();
    let sources = partscan_feed::config_sources();
    let config = FeedConfig::load();

    println!(
        "{}",
        "Feed Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    match &path {
        Some(p) if p.exists() => {
            println!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            println!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            println!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    println!();

    let fields = [
        ("sheet_id", &sources.sheet_id, config.sheet_id.as_str()),
        ("sheet_name", &sources.sheet_name, config.sheet_name.as_str()),
    ];
    for (name, source, value) in fields {
        println!(
            "  {} {} {}",
            format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
            value,
            format!("({})", source).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}

/// Interactively set up the feed config file.
fn run_config_setup() {
    println!(
        "{}",
        "Feed Configuration Setup".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    let existing = FeedConfig::load();

    let read_line = |prompt: &str, default: &str| -> String {
        print!("  {} [{}]: ", prompt, default);
        std::io::stdout().flush().unwrap();

        let mut input = String::new();
        std::io::stdin().read_line(&mut input).unwrap();
        let trimmed = input.trim();

        if trimmed.is_empty() {
            default.to_string()
        } else {
            trimmed.to_string()
        }
    };

    let sheet_id = read_line("sheet_id", &existing.sheet_id);
    let sheet_name = read_line("sheet_name", &existing.sheet_name);

    let config = FeedConfig {
        sheet_id,
        sheet_name,
    };

    match partscan_feed::save_to_file(&config) {
        Ok(path) => {
            println!();
            println!(
                "{} Configuration saved to {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                path.display().if_supports_color(Stdout, |t| t.cyan()),
            );
        }
        Err(e) => {
            eprintln!();
            eprintln!(
                "{} Failed to save configuration: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
        }
    }
}

/// Print the config file path.
fn run_config_path() {
    match partscan_feed::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Could not determine config directory");
            std::process::exit(1);
        }
    }
}
