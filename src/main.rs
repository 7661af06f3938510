//! bootcheck - boot an emulated device, drive its console, score the
//! transcript.
//!
//! Exit codes: 0 when the run passed, 1 when it failed, 2 for
//! configuration problems (unknown profile, bad arguments, unreadable
//! config file).

use std::env;
use std::path::PathBuf;
use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bootcheck::config::loader::ConfigLoader;
use bootcheck::config::Config;
use bootcheck::error::Result;
use bootcheck::harness;
use bootcheck::profile::CommandFilter;
use bootcheck::symbolize;
use bootcheck::HarnessOptions;

/// Parsed command-line arguments
#[derive(Debug, Default)]
struct AppArgs {
    /// Target-profile selector
    profile: Option<String>,
    /// Emulator launch command
    cmd: Option<String>,
    /// Working directory
    working_dir: Option<PathBuf>,
    /// Transcript log path
    logfile: Option<PathBuf>,
    /// Command filter pattern
    filter: Option<String>,
    /// Wait timeout override, seconds
    timeout_secs: Option<u64>,
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Symbolize an existing log instead of running a session
    symbolize: bool,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> Result<Self> {
        let args: Vec<String> = env::args().collect();
        let mut app_args = AppArgs::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--profile" | "-s" => {
                    app_args.profile = Some(Self::value(&args, &mut i, "profile")?);
                }
                "--cmd" | "-c" => {
                    app_args.cmd = Some(Self::value(&args, &mut i, "cmd")?);
                }
                "--working-dir" | "-w" => {
                    app_args.working_dir = Some(PathBuf::from(Self::value(&args, &mut i, "working-dir")?));
                }
                "--logfile" | "-f" => {
                    app_args.logfile = Some(PathBuf::from(Self::value(&args, &mut i, "logfile")?));
                }
                "--filter" | "-t" => {
                    app_args.filter = Some(Self::value(&args, &mut i, "filter")?);
                }
                "--timeout" => {
                    let raw = Self::value(&args, &mut i, "timeout")?;
                    app_args.timeout_secs =
                        Some(raw.parse().map_err(|_| {
                            format!("invalid timeout '{}': expected seconds", raw)
                        })?);
                }
                "--config" => {
                    app_args.config_path = Some(PathBuf::from(Self::value(&args, &mut i, "config")?));
                }
                "--symbolize" => {
                    app_args.symbolize = true;
                }
                "--help" | "-h" => {
                    print_usage();
                    process::exit(0);
                }
                other => {
                    return Err(format!("unknown argument '{}'", other).into());
                }
            }
            i += 1;
        }

        Ok(app_args)
    }

    fn value(args: &[String], i: &mut usize, name: &str) -> Result<String> {
        if *i + 1 < args.len() {
            *i += 1;
            Ok(args[*i].clone())
        } else {
            Err(format!("missing value for --{}", name).into())
        }
    }
}

fn print_usage() {
    println!(
        "Usage: bootcheck [OPTIONS]

Options:
  -s, --profile <NAME>     Target profile to test (e.g. gzos, trusty)
  -c, --cmd <COMMAND>      Command string to start the emulator
  -w, --working-dir <DIR>  Working directory for the emulator
  -f, --logfile <PATH>     Transcript log file (default: expect.log)
  -t, --filter <PATTERN>   Only run commands matching PATTERN ('all' for every command)
      --timeout <SECS>     Boot/prompt wait timeout in seconds
      --config <PATH>      Configuration file
      --symbolize          Symbolize backtraces in an existing log and exit
  -h, --help               Show this help"
    );
}

/// Merge CLI arguments over configuration values into harness options.
fn build_options(args: &AppArgs, config: &Config) -> Result<HarnessOptions> {
    let profile = args
        .profile
        .clone()
        .ok_or("missing required argument --profile")?;
    let launch = args
        .cmd
        .clone()
        .or_else(|| config.launch.command.clone())
        .ok_or("missing launch command: pass --cmd or set [launch] command")?;

    Ok(HarnessOptions {
        profile,
        launch,
        working_dir: args.working_dir.clone().or_else(|| config.launch.working_dir.clone()),
        logfile: args
            .logfile
            .clone()
            .unwrap_or_else(|| config.launch.logfile.clone()),
        filter: CommandFilter::from_arg(args.filter.as_deref().unwrap_or("all")),
        timeout: std::time::Duration::from_secs(
            args.timeout_secs.unwrap_or(config.session.timeout_secs),
        ),
    })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    process::exit(run().await);
}

async fn run() -> i32 {
    let args = match AppArgs::parse() {
        Ok(args) => args,
        Err(e) => {
            error!("{}", e);
            return 2;
        }
    };

    let config = match &args.config_path {
        Some(path) => ConfigLoader::load_from_path(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return 2;
        }
    };

    if args.symbolize {
        return run_symbolize(&args, &config);
    }

    let options = match build_options(&args, &config) {
        Ok(options) => options,
        Err(e) => {
            error!("{}", e);
            return 2;
        }
    };
    let extra_profiles = match config.target_profiles() {
        Ok(profiles) => profiles,
        Err(e) => {
            error!("{}", e);
            return 2;
        }
    };

    match harness::run(&options, &extra_profiles).await {
        Ok(report) => {
            print!("{}", report.render());
            if report.passed() {
                println!("\nTest Passed");
                0
            } else {
                println!("\nTest Failed");
                1
            }
        }
        Err(e) => {
            error!("{}", e);
            2
        }
    }
}

fn run_symbolize(args: &AppArgs, config: &Config) -> i32 {
    let logfile = args
        .logfile
        .clone()
        .unwrap_or_else(|| config.launch.logfile.clone());
    info!("symbolizing backtraces in {}", logfile.display());

    let mut stdout = std::io::stdout();
    match symbolize::symbolize_log(&config.symbolize, &logfile, &mut stdout) {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            2
        }
    }
}
