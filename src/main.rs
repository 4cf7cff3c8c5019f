use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use term_grade::config::Config;
use term_grade::grading::{validate_config, GradeScale, Term};
use term_grade::output::GradedStudent;

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_INPUT: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute grades for every row of a score sheet
    Calculate {
        /// Score sheet (.yaml, .yml or .json)
        sheet: PathBuf,

        /// Term to compute; defaults to the sheet's own term, then midterm
        #[arg(short, long, value_enum)]
        term: Option<Term>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Also write a JSON report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate the config file and report every problem found
    Check,
    /// Show the configured grade scale
    Scale,
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "term-grade")]
#[command(about = "Weighted term grade calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/term-grade/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);
    let use_colors = term_grade::output::should_use_colors();

    match cli.command {
        Commands::Init { force } => {
            let path = config_path.unwrap_or_else(term_grade::config::get_config_path);
            if let Err(e) = term_grade::config::write_default_config(&path, force) {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
            println!("Wrote default config to {}", path.display());
        }
        Commands::Check => {
            let (_, scale) = load_validated_config(config_path);
            println!("Config OK: {} scale entries", scale.entries().len());
        }
        Commands::Scale => {
            let (_, scale) = load_validated_config(config_path);
            println!("{}", term_grade::output::format_scale(&scale, use_colors));
        }
        Commands::Calculate {
            sheet,
            term,
            format,
            output,
        } => {
            let (config, scale) = load_validated_config(config_path);
            run_calculate(
                &sheet,
                term,
                format,
                output,
                config.weights.as_ref(),
                &scale,
                cli.verbose,
                use_colors,
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Load the config, print every problem found and exit if it is unusable.
fn load_validated_config(config_path: Option<PathBuf>) -> (Config, GradeScale) {
    let config = match term_grade::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = validate_config(config.weights.as_ref(), &config.scale) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    match config.grade_scale() {
        Ok(scale) => (config, scale),
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_calculate(
    sheet_path: &Path,
    term: Option<Term>,
    format: OutputFormat,
    output: Option<PathBuf>,
    weights: Option<&term_grade::WeightConfig>,
    scale: &GradeScale,
    verbose: bool,
    use_colors: bool,
) {
    let sheet = match term_grade::batch::load_score_sheet(sheet_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };

    let term = term.or(sheet.term).unwrap_or(Term::Midterm);

    let outcome = match term_grade::batch::compute_batch(&sheet, weights, scale, term) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Warnings go to stderr so they don't pollute tsv/json output
    for warning in &outcome.warnings {
        eprintln!("Warning: {}", warning);
    }

    let students: Vec<GradedStudent> = outcome
        .grades
        .iter()
        .map(|s| GradedStudent {
            name: &s.name,
            grade: &s.grade,
        })
        .collect();

    match format {
        OutputFormat::Table if verbose && !students.is_empty() => {
            for student in &students {
                println!("{}", term_grade::output::format_grade_detail(student, use_colors));
                println!();
            }
        }
        OutputFormat::Table => {
            println!("{}", term_grade::output::format_grade_table(&students, use_colors));
        }
        OutputFormat::Tsv => {
            println!("{}", term_grade::output::format_tsv(&students));
        }
        OutputFormat::Json => {
            let report = term_grade::output::GradeReport::new(term, &outcome);
            match term_grade::output::render_report(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Output error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            }
        }
    }

    if let Some(path) = output {
        let report = term_grade::output::GradeReport::new(term, &outcome);
        if let Err(e) = term_grade::output::write_report(&path, &report) {
            eprintln!("Failed to write report: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }

    if verbose {
        eprintln!(
            "Graded {} students for {} ({} skipped)",
            outcome.grades.len(),
            term,
            outcome.warnings.len()
        );
    }
}
