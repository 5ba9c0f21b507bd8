//! taskmark CLI - intent hashing, derived status and navigation for task records.

use clap::{Parser, Subcommand};
use taskmark_core::DEFAULT_STALENESS_DAYS;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod path;

use commands::{hash, intent, list, nav, status, time};

#[derive(Parser)]
#[command(name = "taskmark")]
#[command(about = "Intent integrity, staleness and eligibility for markdown task records")]
struct Cli {
    /// Log pipeline steps to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical intent blob of a task
    Intent {
        /// Path to task directory
        #[arg(long)]
        task: String,
        /// Output as JSON object with blob, length and hygiene report
        #[arg(long)]
        json: bool,
    },
    /// Print the intent hash of a task and compare it with the recorded one
    Hash {
        /// Path to task directory
        #[arg(long)]
        task: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute derived status and write 99_STATE.md
    Status {
        /// Path to task directory
        #[arg(long)]
        task: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Do not write 99_STATE.md
        #[arg(long)]
        no_write: bool,
        /// Evaluate at this RFC3339 time instead of the current time
        #[arg(long)]
        now: Option<String>,
        /// Default staleness threshold in days
        #[arg(long, env = "TASKMARK_STALENESS_DAYS", default_value_t = DEFAULT_STALENESS_DAYS)]
        staleness_days: u32,
    },
    /// Navigate between tasks, newest first
    Nav {
        /// Root directory containing task directories
        #[arg(long, default_value = "tasks/")]
        root: String,
        /// Get first task (newest)
        #[arg(long)]
        first: bool,
        /// Get last task (oldest)
        #[arg(long)]
        last: bool,
        /// Get task after this ID
        #[arg(long, value_name = "ID")]
        next: Option<String>,
        /// Get task before this ID
        #[arg(long, value_name = "ID")]
        prev: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Output path instead of ID
        #[arg(long)]
        path: bool,
    },
    /// List tasks, newest first
    List {
        /// Root directory containing task directories
        #[arg(long, default_value = "tasks/")]
        root: String,
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Print the current UTC time
    Time,
    /// Offset a timestamp by days, hours and minutes
    Timedelta {
        /// Base RFC3339 timestamp
        #[arg(long, conflicts_with = "now")]
        from: Option<String>,
        /// Use current UTC time as base
        #[arg(long)]
        now: bool,
        /// Days to add (negative to subtract)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        days: i64,
        /// Hours to add (negative to subtract)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        hours: i64,
        /// Minutes to add (negative to subtract)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        minutes: i64,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = std::env::var("TASKMARK_LOG")
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Intent { task, json } => intent::run(task, json),
        Commands::Hash { task, json } => hash::run(task, json),
        Commands::Status {
            task,
            json,
            no_write,
            now,
            staleness_days,
        } => status::run(task, json, no_write, now, staleness_days),
        Commands::Nav {
            root,
            first,
            last,
            next,
            prev,
            json,
            path,
        } => {
            let target = nav::Target::from_flags(first, last, next, prev);
            nav::run(root, target, json, path)
        }
        Commands::List { root, json } => list::run(root, json),
        Commands::Time => time::run_now(),
        Commands::Timedelta {
            from,
            now,
            days,
            hours,
            minutes,
        } => time::run_delta(from, now, days, hours, minutes),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
