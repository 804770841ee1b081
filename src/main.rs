mod app;

use crate::app::InstallMoverApp;
use clap::Parser;
use install_mover::{logging, spawn_move, Config, CopyProgress, MoveRequest, RunOptions, SharedStatus};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Move an installed game to another library folder and update the launcher
/// manifests. Runs headless when name, source and destination are all given,
/// otherwise opens the window.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Install folder name
    #[arg(short, long)]
    name: Option<String>,

    /// Library folder currently containing the install
    #[arg(short, long, value_name = "DIR")]
    source: Option<PathBuf>,

    /// Library folder to move the install into
    #[arg(short, long, value_name = "DIR")]
    destination: Option<PathBuf>,

    /// Launcher manifest folder
    #[arg(short, long, value_name = "DIR")]
    manifest_dir: Option<PathBuf>,

    /// Skip the free space check on the destination disk
    #[arg(long)]
    no_space_check: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Remember the given folders as defaults
    #[arg(long)]
    save_config: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut config = Config::load();

    if let Err(e) = logging::init(args.log_level.as_deref().unwrap_or(&config.log_level)) {
        eprintln!("Logging unavailable: {e}");
    }

    if let Some(dir) = &args.manifest_dir {
        config.manifest_dir = Some(dir.clone());
    }
    if args.source.is_some() {
        config.source_root = args.source.clone();
    }
    if args.destination.is_some() {
        config.destination_root = args.destination.clone();
    }
    if args.no_space_check {
        config.check_free_space = false;
    }
    if args.save_config {
        if let Err(e) = config.save() {
            tracing::error!("Could not save settings: {}", e);
            return ExitCode::FAILURE;
        }
    }

    match (&args.name, &args.source, &args.destination) {
        (Some(name), Some(source), Some(destination)) => {
            let request = MoveRequest::new(
                name.clone(),
                source.clone(),
                destination.clone(),
                config.effective_manifest_dir(),
            );
            run_headless(request, &config)
        }
        (None, None, None) => run_window(config),
        _ => {
            eprintln!("--name, --source and --destination must be given together");
            ExitCode::FAILURE
        }
    }
}

fn run_headless(request: MoveRequest, config: &Config) -> ExitCode {
    let status = SharedStatus::with_listener(|status| println!("{status}"));
    let options = RunOptions {
        check_free_space: config.check_free_space,
    };
    let handle = spawn_move(request, options, Arc::new(CopyProgress::new()), status);
    match handle.join() {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn run_window(config: Config) -> ExitCode {
    let app = InstallMoverApp::new(config);
    let native_options = eframe::NativeOptions::default();
    let result = eframe::run_native(
        "Install Mover",
        native_options,
        Box::new(|_| Box::new(app)),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Window failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
