/// External BOM generator adapters
mod command_bom_tool;

pub use command_bom_tool::{CommandBomTool, ToolCommand};
