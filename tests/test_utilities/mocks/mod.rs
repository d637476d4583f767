/// Mock implementations for testing
mod in_memory_file_tree;
mod mock_bom_tool;
mod mock_command_runner;
mod mock_progress_reporter;

pub use in_memory_file_tree::InMemoryFileTree;
pub use mock_bom_tool::MockBomTool;
pub use mock_command_runner::MockCommandRunner;
pub use mock_progress_reporter::MockProgressReporter;
