use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use goodwill_forms::config::RouterConfig;
use goodwill_forms::io::form_files::FormDirectory;
use goodwill_forms::io::outbox::OutboxMailer;
use goodwill_forms::io::workbook_store::WorkbookStore;
use goodwill_forms::model::FormSubmission;
use goodwill_forms::services::{Services, SpreadsheetService};
use goodwill_forms::{FormsError, Result, pathways, rewrite, selftest, submission};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose)?;
    let config = RouterConfig::load(&cli.config)?;
    let backends = Backends::open(&config);

    match cli.command {
        Command::Submit { event } => execute_submit(&config, backends, &event),
        Command::RewriteMaster => execute_rewrite(&config, backends),
        Command::SelfTest => execute_self_test(&config, backends),
        Command::Export { output } => execute_export(&config, &backends.sheets, &output),
        Command::OptOut { known } => execute_opt_out(&config, &backends.sheets, known.as_deref()),
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("goodwill_forms=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("goodwill_forms=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| FormsError::Logging(error.to_string()))
}

struct Backends {
    sheets: WorkbookStore,
    forms: FormDirectory,
    mail: OutboxMailer,
}

impl Backends {
    fn open(config: &RouterConfig) -> Self {
        Self {
            sheets: WorkbookStore::new(&config.storage.spreadsheets_dir),
            forms: FormDirectory::new(&config.storage.forms_dir),
            mail: OutboxMailer::new(&config.storage.outbox_dir),
        }
    }
}

fn execute_submit(config: &RouterConfig, mut backends: Backends, event: &Path) -> Result<()> {
    let submission: FormSubmission = load_json(event)?;
    let mut services = Services::new(&mut backends.sheets, &backends.forms, &mut backends.mail);
    let outcome = submission::handle_submission(&mut services, config, &submission)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn execute_rewrite(config: &RouterConfig, mut backends: Backends) -> Result<()> {
    let summary = rewrite::rewrite_master_sheet(&mut backends.sheets, config)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn execute_self_test(config: &RouterConfig, mut backends: Backends) -> Result<()> {
    let services = Services::new(&mut backends.sheets, &backends.forms, &mut backends.mail);
    let report = selftest::run_self_test(&services, config)?;
    print!("{}", report.to_tap());
    if report.failures() > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn execute_export(config: &RouterConfig, sheets: &WorkbookStore, output: &Path) -> Result<()> {
    let values = sheets.data_range(&config.master_sheet_id)?;
    let records = pathways::to_program_records(&values, &config.master_sheet_id);
    fs::write(output, serde_json::to_string_pretty(&records)?)?;
    tracing::info!(records = records.len(), output = %output.display(), "program records exported");
    Ok(())
}

fn execute_opt_out(config: &RouterConfig, sheets: &WorkbookStore, known: Option<&Path>) -> Result<()> {
    let known_ids: Vec<String> = match known {
        Some(path) => load_json(path)?,
        None => Vec::new(),
    };
    let values = sheets.data_range(&config.master_sheet_id)?;
    let report = pathways::opt_out(&values, &known_ids);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(FormsError::MissingInput(path.to_path_buf()));
    }
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Route program-data form submissions into member spreadsheets."
)]
struct Cli {
    /// Router configuration file.
    #[arg(long, global = true, default_value = "goodwill-forms.json")]
    config: PathBuf,

    /// Log at debug level regardless of RUST_LOG.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Handle one form submission event.
    Submit {
        /// Event payload with `values` and `namedValues`.
        #[arg(long)]
        event: PathBuf,
    },
    /// Rebuild the master sheet from every member sheet.
    RewriteMaster,
    /// Run smoke checks against the configured backends.
    SelfTest,
    /// Export master-sheet rows as pathways program records.
    Export {
        /// Output JSON file.
        #[arg(long)]
        output: PathBuf,
    },
    /// List programs to withdraw from the pathways catalogue.
    OptOut {
        /// JSON array of row identifiers currently listed.
        #[arg(long)]
        known: Option<PathBuf>,
    },
}
