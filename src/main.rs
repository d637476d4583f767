mod adapters;
mod application;
mod cli;
mod config;
mod inventory;
mod ports;
mod shared;

use adapters::outbound::console::StderrProgressReporter;
use adapters::outbound::cpe::PurlCpeResolver;
use adapters::outbound::filesystem::LocalFileTree;
use adapters::outbound::process::TokioCommandRunner;
use adapters::outbound::source::GitCheckout;
use adapters::outbound::tools::CommandBomTool;
use application::dto::CollectOutcome;
use application::factories::{CodecFactory, CollectorFactory, PresenterFactory};
use application::use_cases::{CollectBomUseCase, CollectRepositoryUseCase};
use cli::{Args, CollectArgs, Command, Settings};
use ports::outbound::{CommandRunner, ToolOptions};
use shared::error::{ExitCode, SbomError};
use shared::Result;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();
    init_tracing(args.verbose);

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling");
            interrupt.cancel();
        }
    });

    let code = match run(args, cancel).await {
        Ok(code) => code,
        Err(e) if is_cancelled(&e) => {
            eprintln!("\n⛔ Interrupted, no BOM was written.");
            ExitCode::Interrupted
        }
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            ExitCode::ApplicationError
        }
    };

    process::exit(code.as_i32());
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn is_cancelled(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<SbomError>()
        .is_some_and(SbomError::is_cancelled)
}

async fn run(args: Args, cancel: CancellationToken) -> Result<ExitCode> {
    let quiet = args.quiet;
    let reporter = if quiet {
        StderrProgressReporter::quiet()
    } else {
        StderrProgressReporter::new()
    };

    match args.command {
        Command::Collectors => {
            for name in CollectorFactory::builtin_names() {
                println!("{}", name);
            }
            Ok(ExitCode::Success)
        }
        Command::Path { dir, options } => {
            validate_project_path(&dir)?;
            let config = load_config(&options, Some(&dir))?;
            let settings = Settings::resolve(options, config)?;
            let use_case = collect_use_case(&settings, reporter, cancel)?;

            let repository_root = dir.canonicalize()?;
            let outcome = use_case.execute(settings.request(repository_root.clone())).await?;
            finish(outcome, &settings, &repository_root, quiet)
        }
        Command::Repo { url, options } => {
            let config = load_config(&options, None)?;
            let settings = Settings::resolve(options, config)?;
            let runner: Arc<dyn CommandRunner> = Arc::new(TokioCommandRunner::new(cancel.clone()));
            let use_case = CollectRepositoryUseCase::new(
                GitCheckout::new(runner),
                collect_use_case(&settings, reporter, cancel)?,
            );

            // The checkout location is replaced by the use case.
            let outcome = use_case
                .execute(&url, settings.request(PathBuf::new()))
                .await?;
            finish(outcome, &settings, Path::new(&url), quiet)
        }
    }
}

/// Explicit `--config` wins; otherwise look next to the scanned directory
fn load_config(
    options: &CollectArgs,
    scanned_dir: Option<&Path>,
) -> Result<Option<config::ConfigFile>> {
    match (&options.config, scanned_dir) {
        (Some(path), _) => config::load_config_from_path(path).map(Some),
        (None, Some(dir)) => config::discover_config(dir),
        (None, None) => Ok(None),
    }
}

fn collect_use_case(
    settings: &Settings,
    reporter: StderrProgressReporter,
    cancel: CancellationToken,
) -> Result<CollectBomUseCase<LocalFileTree, PurlCpeResolver, StderrProgressReporter>> {
    let runner: Arc<dyn CommandRunner> = Arc::new(TokioCommandRunner::new(cancel.clone()));
    let tool_runner: Arc<dyn CommandRunner> = match settings.timeout {
        Some(timeout) => Arc::new(TokioCommandRunner::new(cancel.clone()).with_timeout(timeout)),
        None => runner.clone(),
    };
    let tool = Arc::new(CommandBomTool::new(tool_runner, settings.tool.clone()));

    let registry =
        CollectorFactory::builtin(tool, runner, ToolOptions::json(), &settings.collectors)?;
    debug!(collectors = ?registry.names(), "collector registry built");

    Ok(CollectBomUseCase::new(
        registry,
        LocalFileTree::new(),
        PurlCpeResolver::new(),
        reporter,
        cancel,
    )
    .with_parallelism(settings.jobs))
}

fn finish(
    outcome: CollectOutcome,
    settings: &Settings,
    subject: &Path,
    quiet: bool,
) -> Result<ExitCode> {
    let bom = match outcome {
        CollectOutcome::Collected { bom, .. } => bom,
        CollectOutcome::UnsupportedRepository { .. } => {
            let unsupported = SbomError::UnsupportedRepository {
                path: subject.to_path_buf(),
            };
            eprintln!("\n⚠️  {}\n", unsupported);
            return Ok(ExitCode::UnsupportedRepository);
        }
    };

    if !quiet {
        eprintln!("{}", CodecFactory::progress_message(settings.format));
    }

    let content = CodecFactory::create(settings.format).encode(&bom)?;
    let presenter = PresenterFactory::create(settings.output.clone().into());
    presenter.present(&content)?;

    Ok(ExitCode::Success)
}

fn validate_project_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(SbomError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Directory does not exist".to_string(),
        }
        .into());
    }

    // Security check: Reject symbolic links for project paths
    let metadata = std::fs::symlink_metadata(path).map_err(|e| SbomError::InvalidProjectPath {
        path: path.to_path_buf(),
        reason: format!("Failed to read path metadata: {}", e),
    })?;

    if metadata.is_symlink() {
        return Err(SbomError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Security: Project path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
        }
        .into());
    }

    if !path.is_dir() {
        return Err(SbomError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }

    Ok(())
}
