mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Weekly store report analysis: food waste and single-origin espresso mix"
)]
struct Cli {
    /// Log pipeline decisions to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate, parse and rank a store report PDF
    Analyze {
        /// Path to the report PDF
        input_file: PathBuf,

        /// Expected report type: waste or single-origin (default: detect)
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        report_type: Option<String>,

        /// Custom vocabulary JSON file (default: built-in preset)
        #[arg(long, value_name = "FILE")]
        vocab: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the full analysis to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Inspect and check row-classification vocabularies
    Vocab {
        #[command(subcommand)]
        action: VocabAction,
    },
    /// Email rendered report files to a recipient
    Send {
        /// Files to attach (PDF or PNG)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Recipient address
        #[arg(long)]
        to: String,

        /// Sender address
        #[arg(long, default_value = "reports@localhost.localdomain")]
        from: String,

        #[arg(long, default_value = "Store report")]
        subject: String,

        #[arg(long, default_value = "Please find the latest report charts attached.")]
        body: String,

        /// sendmail-compatible program to pipe the message to
        #[arg(long, value_name = "PATH", default_value = "sendmail")]
        sendmail: PathBuf,
    },
}

#[derive(Subcommand)]
enum VocabAction {
    /// List built-in vocabularies
    List,
    /// Print a built-in vocabulary
    Show {
        /// Preset name (e.g., "default")
        preset: String,
    },
    /// Validate a custom vocabulary file
    Validate {
        /// Path to JSON vocabulary file
        file: PathBuf,
    },
    /// Print the vocabulary JSON schema with field descriptions
    Schema,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "tally_core=debug" } else { "tally_core=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            input_file,
            report_type,
            vocab,
            output,
            out,
        } => commands::analyze::run(input_file, report_type.as_deref(), vocab, &output, out),
        Commands::Vocab { action } => match action {
            VocabAction::List => commands::vocab::list(),
            VocabAction::Show { preset } => commands::vocab::show(&preset),
            VocabAction::Validate { file } => commands::vocab::validate(&file),
            VocabAction::Schema => commands::vocab::schema(),
        },
        Commands::Send {
            files,
            to,
            from,
            subject,
            body,
            sendmail,
        } => commands::send::run(files, to, from, subject, body, sendmail),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
