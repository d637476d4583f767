mod bom_merger;
mod cpe_attacher;
mod metadata_generator;
mod path_filter;
mod path_reducer;
mod root_finder;
mod scope_filter;

pub use bom_merger::BomMerger;
pub use cpe_attacher::CpeAttacher;
pub use metadata_generator::{BomHeader, MetadataGenerator};
pub use path_filter::PathFilter;
pub use path_reducer::{PathReducer, RootReduction};
pub use root_finder::{RootFinder, DEFAULT_IGNORED_NAMES};
pub use scope_filter::ScopeFilter;
