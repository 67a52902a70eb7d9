//! # profile-backup
//! Backs up the selected user profiles in parallel and reports one
//! verdict per profile.
//!

use std::{
    env, fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use mimalloc::MiMalloc;
use profile_backup::{config::Config, dispatcher, engine::Robocopy, report, target};
use shared::{Failure, init_logger};
use tracing::{error, info, warn};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let log_path = init_logger(Path::new("./logs")).or_log_and_panic("Could not create logger");

    // Initialize config if args include 'init'.
    if env::args().any(|arg| arg.eq("init")) {
        let config = Config::default();
        let contents =
            toml::to_string_pretty(&config).or_log_and_panic("Could not serialize config file");
        fs::write("config.toml", contents).or_log_and_panic("Could not create config file");
        info!("Wrote default config.toml");
        return ExitCode::SUCCESS;
    }

    // Load config
    let config = match Config::load_toml(PathBuf::from("./config.toml")) {
        Ok(config) => config,
        Err(error) => {
            error!("Could not load config: {error}");
            return ExitCode::FAILURE;
        }
    };

    // Discover profiles and select the requested ones. Remaining args are
    // user names, or 'all' for every discovered profile.
    let requested: Vec<String> = env::args().skip(1).collect();
    let discovered = match target::discover_targets(&config.profiles_root) {
        Ok(discovered) => discovered,
        Err(error) => {
            error!(
                "Could not enumerate profiles under {:?}: {error}",
                config.profiles_root
            );
            return ExitCode::FAILURE;
        }
    };

    let targets = target::select_targets(discovered, &requested);
    if targets.is_empty() {
        error!("No valid profiles selected");
        return ExitCode::FAILURE;
    }

    // Pre-flight: the destination root must exist before dispatch.
    if let Err(error) = fs::create_dir_all(&config.destination_root) {
        error!(
            "Could not create destination root {:?}: {error}",
            config.destination_root
        );
        return ExitCode::FAILURE;
    }

    let results = dispatcher::run_all(targets, &config, &Robocopy);
    let summary = report::aggregate(results);
    print!("{}", report::render(&summary));

    archive_run_log(&log_path, &config.destination_root);

    if summary.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Copy the run log next to the backups for post-mortems.
fn archive_run_log(log_path: &Path, destination_root: &Path) {
    let Some(file_name) = log_path.file_name() else {
        return;
    };

    if let Err(error) = fs::copy(log_path, destination_root.join(file_name)) {
        warn!("Could not archive the run log: {error}");
    }
}
