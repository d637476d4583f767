/// Use cases module containing application business logic orchestration
mod collect_bom;
mod collect_repository;

pub use collect_bom::{CollectBomUseCase, PipelineStage, DEFAULT_PARALLELISM, TAG_PROPERTY};
pub use collect_repository::CollectRepositoryUseCase;
