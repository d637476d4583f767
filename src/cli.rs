use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::adapters::outbound::tools::ToolCommand;
use crate::application::dto::{BomFormat, CollectRequest};
use crate::application::use_cases::DEFAULT_PARALLELISM;
use crate::config::ConfigFile;
use crate::inventory::domain::Scope;
use crate::shared::Result;

/// Collect CycloneDX SBOMs from every ecosystem in a repository
#[derive(Parser, Debug)]
#[command(name = "bom-harvest")]
#[command(version)]
#[command(
    about = "Collect CycloneDX SBOMs from every ecosystem in a repository and merge them into one",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors, no progress
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Collect a repository that is already checked out locally
    Path {
        /// Repository directory
        #[arg(default_value = ".")]
        dir: PathBuf,

        #[command(flatten)]
        options: CollectArgs,
    },
    /// Clone a git repository into a temporary workspace and collect it
    Repo {
        /// Repository URL accepted by `git clone`
        url: String,

        #[command(flatten)]
        options: CollectArgs,
    },
    /// List the built-in collectors
    Collectors,
}

#[derive(ClapArgs, Debug, Default, Clone)]
pub struct CollectArgs {
    /// Output format: json or xml [default: json]
    #[arg(short, long)]
    pub format: Option<BomFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exclude paths from discovery (supports wildcards: *)
    /// Can be specified multiple times: -e "vendor" -e "fixtures-*"
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Drop merged components with this scope: required, optional or excluded
    #[arg(long, value_name = "SCOPE")]
    pub exclude_scope: Option<Scope>,

    /// Configuration file (defaults to bom-harvest.config.yml in the scanned directory)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only run the named collectors; can be specified multiple times
    #[arg(long = "collector", value_name = "NAME")]
    pub collectors: Vec<String>,

    /// Attach CPE identifiers derived from package URLs
    #[arg(long = "cpe")]
    pub attach_cpe: bool,

    /// Free-form tag recorded in the BOM metadata; can be specified multiple times
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Timeout in seconds for each external tool invocation
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Maximum number of generator invocations running at once [default: 4]
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub jobs: Option<u64>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Effective options for one run, after CLI flags were laid over the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub format: BomFormat,
    pub output: Option<PathBuf>,
    pub exclude_paths: Vec<String>,
    pub exclude_scope: Option<Scope>,
    pub collectors: Vec<String>,
    pub attach_cpe: bool,
    pub tags: Vec<String>,
    pub tool: ToolCommand,
    pub timeout: Option<Duration>,
    pub jobs: usize,
}

impl Settings {
    /// Resolves settings; CLI values win over config values, which win over defaults
    ///
    /// # Errors
    /// Returns an error if a config value fails to parse.
    pub fn resolve(cli: CollectArgs, config: Option<ConfigFile>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let format = match (cli.format, config.format.as_deref()) {
            (Some(format), _) => format,
            (None, Some(name)) => BomFormat::from_str(name)?,
            (None, None) => BomFormat::default(),
        };
        let exclude_scope = match (cli.exclude_scope, config.exclude_scope.as_deref()) {
            (Some(scope), _) => Some(scope),
            (None, Some(name)) => Some(Scope::from_str(name)?),
            (None, None) => None,
        };

        let tool_config = config.tool.unwrap_or_default();
        let mut tool = ToolCommand::default();
        if let Some(program) = tool_config.program {
            tool.program = program;
        }
        if let Some(args) = tool_config.args {
            tool.args = args;
        }
        if let Some(markers) = tool_config.failure_markers {
            tool.failure_markers = markers;
        }
        let timeout = cli
            .timeout
            .or(tool_config.timeout_secs)
            .map(Duration::from_secs);
        let jobs = cli
            .jobs
            .or(config.jobs)
            .map_or(DEFAULT_PARALLELISM, |n| n as usize);

        Ok(Self {
            format,
            output: cli.output,
            exclude_paths: prefer_cli(cli.exclude, config.exclude_paths),
            exclude_scope,
            collectors: prefer_cli(cli.collectors, config.collectors),
            attach_cpe: cli.attach_cpe || config.attach_cpe.unwrap_or(false),
            tags: prefer_cli(cli.tags, config.tags),
            tool,
            timeout,
            jobs,
        })
    }

    /// Builds the collection request for `repository_root`
    pub fn request(&self, repository_root: PathBuf) -> CollectRequest {
        CollectRequest::builder()
            .repository_root(repository_root)
            .exclude_paths(self.exclude_paths.clone())
            .exclude_scope(self.exclude_scope)
            .attach_cpe(self.attach_cpe)
            .tags(self.tags.clone())
            .build()
    }
}

fn prefer_cli(cli: Vec<String>, config: Option<Vec<String>>) -> Vec<String> {
    if cli.is_empty() {
        config.unwrap_or_default()
    } else {
        cli
    }
}
