use clap::Parser;
use colored::Colorize;
use miette::{miette, Result};
use std::path::PathBuf;
use tracing::info;

use findusages::config::Config;
use findusages::discovery::FileFinder;
use findusages::editor;
use findusages::interactive;
use findusages::report::{ReportFormat, ReportOptions, Reporter};
use findusages::scan::{
    Capabilities, EngineChoice, ScanOptions, ScanOrchestrator, SearchMode,
};
use findusages::target::{self, select_members};

/// findusages - find usages of a Kotlin/Java class, its methods, or fields
#[derive(Parser, Debug)]
#[command(name = "findusages")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the target class file (prompted for when omitted)
    target: Option<PathBuf>,

    /// Search root directory
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Search mode (prompted for when omitted on a terminal)
    #[arg(short, long, value_enum)]
    mode: Option<CliMode>,

    /// Member selection for method/field modes: comma-separated names,
    /// /regex/, or 'all'
    #[arg(long)]
    member: Option<String>,

    /// Output JSON instead of the table
    #[arg(long)]
    json: bool,

    /// Include line numbers and snippets in the output
    #[arg(long)]
    with_lines: bool,

    /// Only report files with an explicit import or FQN usage
    #[arg(long)]
    strict_import: bool,

    /// Retain simple-name matches outside the target's package even
    /// without an import
    #[arg(long)]
    same_package_ok: bool,

    /// Comma-separated file extensions to scan
    #[arg(long)]
    ext: Option<String>,

    /// Matching engine
    #[arg(long, value_enum)]
    engine: Option<CliEngine>,

    /// Follow symbolic links during discovery
    #[arg(long)]
    follow_symlinks: bool,

    /// Write the JSON report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Open all matching locations in an editor
    #[arg(long)]
    open: bool,

    /// Interactively select which locations to open
    #[arg(long)]
    select: bool,

    /// Limit the number of files shown in table output
    #[arg(long)]
    limit: Option<usize>,

    /// Disable ANSI color output
    #[arg(long)]
    no_color: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CliMode {
    Class,
    Method,
    Field,
}

impl From<CliMode> for SearchMode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Class => SearchMode::Class,
            CliMode::Method => SearchMode::Method,
            CliMode::Field => SearchMode::Field,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CliEngine {
    Auto,
    Pattern,
    Structural,
}

impl From<CliEngine> for EngineChoice {
    fn from(engine: CliEngine) -> Self {
        match engine {
            CliEngine::Auto => EngineChoice::Auto,
            CliEngine::Pattern => EngineChoice::Pattern,
            CliEngine::Structural => EngineChoice::Structural,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(found) => std::process::exit(if found { 0 } else { 1 }),
        Err(e) => {
            eprintln!("{:?}", e);
            std::process::exit(2);
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Run one search. Returns whether any usage was found.
fn run(cli: &Cli) -> Result<bool> {
    let config = load_config(cli)?;
    let attended = console::user_attended();

    // Step 1: resolve the target file and its member inventory.
    let target_path = match &cli.target {
        Some(path) => path.clone(),
        None if attended => interactive::prompt_target_path()?,
        None => return Err(miette!("no target file given (pass it as an argument)")),
    };
    let spec = target::resolve(&target_path)?;
    info!("target: {} ({})", spec.simple_name, spec.fqn);

    // Step 2: mode and member selection.
    let mode: SearchMode = match cli.mode {
        Some(mode) => mode.into(),
        None if attended => interactive::prompt_mode()?,
        None => SearchMode::Class,
    };

    let members: Vec<String> = match mode.member_kind() {
        None => Vec::new(),
        Some(kind) => {
            let available = spec.members_of_kind(kind);
            if available.is_empty() {
                return Err(miette!(
                    "no {} found in target class {}",
                    kind.plural(),
                    spec.simple_name
                ));
            }
            match &cli.member {
                Some(input) => select_members(input, &available, kind).map_err(miette::Report::from)?,
                None if attended => interactive::prompt_members(&spec, kind)?,
                None => {
                    return Err(miette!(
                        "--member is required when --mode is {}",
                        mode.as_str()
                    ))
                }
            }
        }
    };

    // Step 3: enumerate candidate files.
    let files = FileFinder::new(&config).find_files(&cli.root);
    if files.is_empty() {
        if !cli.quiet && !cli.json {
            println!("{}", "No Kotlin or Java files found.".yellow());
        }
        return Ok(false);
    }
    info!("found {} candidate files", files.len());

    // Step 4: scan.
    let options = ScanOptions {
        mode,
        members: members.clone(),
        strict_import: cli.strict_import || config.strict_import,
        same_package_ok: cli.same_package_ok || config.same_package_ok,
    };

    let engine = match cli.engine {
        Some(engine) => engine.into(),
        None => parse_engine(&config.engine),
    };

    let capabilities = Capabilities {
        structural: true,
        progress: attended && !cli.no_progress && !cli.quiet && !cli.json,
    };

    let orchestrator = ScanOrchestrator::new(&spec, &options, engine, capabilities)
        .map_err(miette::Report::from)?;
    let summary = orchestrator.scan_files(&files, &target_path);

    // Step 5: editor workflow.
    if cli.open || cli.select {
        let mut sorted = summary.results.clone();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));
        editor::open_results(&sorted, cli.select)?;
    }

    // Step 6: report.
    let format = if cli.json {
        ReportFormat::Json
    } else {
        ReportFormat::Terminal
    };
    let reporter = Reporter::new(
        format,
        ReportOptions {
            with_lines: cli.with_lines,
            limit: cli.limit,
            output: cli.output.clone(),
            no_color: cli.no_color,
        },
    );
    reporter.report(&spec, mode, &members, &summary.results)?;

    if summary.unreadable > 0 && !cli.quiet {
        eprintln!(
            "{}",
            format!("{} files could not be read", summary.unreadable).dimmed()
        );
    }

    Ok(!summary.results.is_empty())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&cli.root)?
    };

    if let Some(ext) = &cli.ext {
        config.extensions = ext
            .split(',')
            .map(|e| e.trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        if config.extensions.is_empty() {
            return Err(miette!("no valid extensions in --ext"));
        }
    }
    if cli.follow_symlinks {
        config.follow_symlinks = true;
    }

    Ok(config)
}

fn parse_engine(name: &str) -> EngineChoice {
    match name {
        "pattern" => EngineChoice::Pattern,
        "structural" => EngineChoice::Structural,
        _ => EngineChoice::Auto,
    }
}
