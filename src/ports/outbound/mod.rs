/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, processes, console, etc.).
pub mod bom_codec;
pub mod bom_tool;
pub mod collector;
pub mod command_runner;
pub mod cpe_resolver;
pub mod file_tree;
pub mod output_presenter;
pub mod progress_reporter;
pub mod repository_source;

pub use bom_codec::BomCodec;
pub use bom_tool::{BomTool, ToolOptions};
pub use collector::{Collector, CollectorRegistry, ProjectCollector, RepositoryCollector};
pub use command_runner::{CommandOutput, CommandRunner};
pub use cpe_resolver::CpeResolver;
pub use file_tree::{FileTree, TreeEntry, WalkAction};
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use repository_source::RepositorySource;
