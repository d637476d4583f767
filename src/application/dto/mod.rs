/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod bom_format;
mod collect_outcome;
mod collect_request;

pub use bom_format::BomFormat;
pub use collect_outcome::{CollectOutcome, RunSummary};
pub use collect_request::{CollectRequest, CollectRequestBuilder};
