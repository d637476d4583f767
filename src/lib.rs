//! bom-harvest - repository-wide CycloneDX SBOM collection
//!
//! This library discovers every supported ecosystem inside a repository,
//! runs an external BOM generator once per project root, and merges the
//! partial BOMs into one canonical CycloneDX document.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`inventory`): BOM value types and pure services
//!   (root discovery, path reduction, merging, post-processing)
//! - **Application Layer** (`application`): Use cases, DTOs and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use bom_harvest::prelude::*;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<()> {
//! let cancel = CancellationToken::new();
//! let runner: Arc<dyn CommandRunner> = Arc::new(TokioCommandRunner::new(cancel.clone()));
//! let tool = Arc::new(CommandBomTool::new(runner.clone(), ToolCommand::default()));
//! let registry = CollectorFactory::builtin(tool, runner, ToolOptions::json(), &[])?;
//!
//! let use_case = CollectBomUseCase::new(
//!     registry,
//!     LocalFileTree::new(),
//!     PurlCpeResolver::new(),
//!     StderrProgressReporter::new(),
//!     cancel,
//! );
//!
//! let outcome = use_case.execute(CollectRequest::new(".".into())).await?;
//! if let Some(bom) = outcome.bom() {
//!     println!("{}", CodecFactory::create(BomFormat::Json).encode(bom)?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod inventory;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::codecs::{CycloneDxJsonCodec, CycloneDxXmlCodec};
    pub use crate::adapters::outbound::collectors::{
        Ecosystem, GithubActionsCollector, ToolCollector,
    };
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::cpe::PurlCpeResolver;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemWriter, LocalFileTree, StdoutPresenter,
    };
    pub use crate::adapters::outbound::process::TokioCommandRunner;
    pub use crate::adapters::outbound::source::GitCheckout;
    pub use crate::adapters::outbound::tools::{CommandBomTool, ToolCommand};
    pub use crate::application::dto::{BomFormat, CollectOutcome, CollectRequest, RunSummary};
    pub use crate::application::factories::{CodecFactory, CollectorFactory};
    pub use crate::application::use_cases::{
        CollectBomUseCase, CollectRepositoryUseCase, TAG_PROPERTY,
    };
    pub use crate::inventory::domain::{
        Bom, BomMetadata, Component, ComponentType, Dependency, ExternalReference, Hash,
        License, LicenseChoice, ProjectRoot, Property, Scope, Tool,
    };
    pub use crate::inventory::services::{BomMerger, PathReducer, RootFinder, RootReduction};
    pub use crate::ports::outbound::{
        BomCodec, BomTool, Collector, CollectorRegistry, CommandOutput, CommandRunner,
        CpeResolver, FileTree, OutputPresenter, ProgressReporter, ProjectCollector,
        RepositoryCollector, RepositorySource, ToolOptions, TreeEntry, WalkAction,
    };
    pub use crate::shared::error::{ExitCode, SbomError};
    pub use crate::shared::Result;
}
