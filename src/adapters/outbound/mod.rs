/// Outbound adapters - Infrastructure implementations of outbound ports
pub mod codecs;
pub mod collectors;
pub mod console;
pub mod cpe;
pub mod filesystem;
pub mod process;
pub mod source;
pub mod tools;
