mod imaging;
mod schedule;
mod sky;
mod web;

use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use crate::imaging::{ObservationRequest, RawRequest};
use crate::schedule::{BlockKind, SchedulePlan};
use crate::sky::{Horizon, Site};
use crate::web::Config;

#[derive(Parser)]
#[command(name = "textgen")]
#[command(about = "LOFAR imaging schedule generator")]
struct Cli {
    /// More output per occurrence (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an imaging request file
    Validate {
        request: String,
        /// Station configuration (defaults to the LOFAR core)
        #[arg(long)]
        config: Option<String>,
    },
    /// Write the schedule for an imaging request
    Generate {
        request: String,
        /// Output file, stdout if omitted
        #[arg(short, long)]
        output: Option<String>,
        /// Station configuration (defaults to the LOFAR core)
        #[arg(long)]
        config: Option<String>,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        config: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Validate { request, config } => validate(&request, config.as_deref()),
        Commands::Generate {
            request,
            output,
            config,
        } => generate(&request, output.as_deref(), config.as_deref()),
        Commands::Serve { config } => serve(&config),
    }
}

/// Logs go to stderr so that a schedule written to stdout stays clean.
fn setup_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stderr);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        _ => builder.filter_level(log::LevelFilter::Trace),
    };
    builder.init();
}

fn load_site(config: Option<&str>) -> Result<Site, ExitCode> {
    match config {
        None => Ok(Site::default()),
        Some(path) => match Config::from_file(path) {
            Ok(c) => Ok(c.site()),
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                Err(ExitCode::FAILURE)
            }
        },
    }
}

fn load_request(path: &str) -> Result<ObservationRequest, ExitCode> {
    let yaml = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    let raw: RawRequest = match serde_yaml::from_str(&yaml) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    ObservationRequest::from_raw(&raw, &Horizon).map_err(|e| {
        eprintln!("Invalid request: {}", e);
        ExitCode::FAILURE
    })
}

fn validate(path: &str, config: Option<&str>) -> ExitCode {
    let (site, request) = match (load_site(config), load_request(path)) {
        (Ok(s), Ok(r)) => (s, r),
        (Err(code), _) | (_, Err(code)) => return code,
    };

    let plan = match schedule::plan(&request, &site, &Horizon) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Invalid request: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Request is valid ({} targets, {} subbands, {} beamlets)",
        request.n_beams(),
        request.subbands.count,
        request.n_beamlets()
    );
    println!(
        "  averaging: {} channels, {} s",
        request.averaging.frequency, request.averaging.time
    );
    for target in &request.targets {
        let demix = if target.demix.is_empty() {
            "no demixing".to_string()
        } else {
            format!("demix {}", target.demix_list())
        };
        println!("  {} @ {} {} ({})", target.label, target.ra, target.dec, demix);
    }
    print_plan(&plan);
    ExitCode::SUCCESS
}

fn print_plan(plan: &SchedulePlan) {
    for (i, block) in plan.blocks.iter().enumerate() {
        let what = match block.kind {
            BlockKind::Calibrator(cal) => format!("calibrator {}", cal.name),
            BlockKind::Target => "targets".to_string(),
        };
        let length = (block.end - block.start).to_std().unwrap_or_default();
        println!(
            "  {}: {} @ {} for {}",
            i + 1,
            what,
            block.start,
            humantime::format_duration(length)
        );
    }
}

fn generate(path: &str, output: Option<&str>, config: Option<&str>) -> ExitCode {
    let (site, request) = match (load_site(config), load_request(path)) {
        (Ok(s), Ok(r)) => (s, r),
        (Err(code), _) | (_, Err(code)) => return code,
    };

    let out: Box<dyn Write> = match output {
        Some(file) => match File::create(file) {
            Ok(f) => Box::new(BufWriter::new(f)),
            Err(e) => {
                eprintln!("Error creating {}: {}", file, e);
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(io::stdout().lock()),
    };

    match schedule::generate(&request, &site, &Horizon, out) {
        Ok(plan) => {
            if let Some(end) = plan.end() {
                log::info!("Schedule ends at {}", end);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn serve(path: &str) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(web::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
