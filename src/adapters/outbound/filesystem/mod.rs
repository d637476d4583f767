/// Filesystem adapters for tree enumeration and output
mod file_writer;
mod local_file_tree;

pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use local_file_tree::LocalFileTree;
