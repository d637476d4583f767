use crate::application::dto::{CollectOutcome, CollectRequest, RunSummary};
use crate::inventory::domain::{Bom, ProjectRoot, Property};
use crate::inventory::services::{
    BomMerger, CpeAttacher, PathFilter, PathReducer, RootFinder, ScopeFilter,
};
use crate::ports::outbound::{
    Collector, CollectorRegistry, CpeResolver, FileTree, ProgressReporter, ProjectCollector,
    RepositoryCollector,
};
use crate::shared::error::SbomError;
use crate::shared::Result;
use futures::stream::{self, StreamExt};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Property name under which free-form tags are recorded in BOM metadata
pub const TAG_PROPERTY: &str = "bom-harvest:tag";

/// Default number of generation jobs run at the same time
pub const DEFAULT_PARALLELISM: usize = 4;

/// Stages one repository run moves through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Discover,
    Bootstrap,
    Generate,
    Merge,
    Filter,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Discover => "discover",
            PipelineStage::Bootstrap => "bootstrap",
            PipelineStage::Generate => "generate",
            PipelineStage::Merge => "merge",
            PipelineStage::Filter => "filter",
            PipelineStage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// One unit of generation work
enum GenerationJob {
    Repository(Arc<dyn RepositoryCollector>),
    Project(Arc<dyn ProjectCollector>, ProjectRoot),
}

impl GenerationJob {
    fn collector(&self) -> &str {
        match self {
            GenerationJob::Repository(c) => c.name(),
            GenerationJob::Project(c, _) => c.name(),
        }
    }

    fn root<'a>(&'a self, repository_root: &'a Path) -> &'a Path {
        match self {
            GenerationJob::Repository(_) => repository_root,
            GenerationJob::Project(_, root) => root.directory(),
        }
    }

    async fn run(&self, repository_root: &Path) -> Result<Bom> {
        match self {
            GenerationJob::Repository(c) => c.generate(repository_root).await,
            GenerationJob::Project(c, root) => c.generate(root).await,
        }
    }
}

/// CollectBomUseCase - orchestrates collection for one repository
///
/// Runs discovery, bootstrap and generation for every registered collector,
/// containing per-collector and per-root failures, then merges whatever was
/// produced. Merge does not start until every generation attempt finished.
///
/// # Type Parameters
/// * `FT` - FileTree implementation used for root discovery
/// * `CR` - CpeResolver implementation used when CPE attachment is requested
/// * `PR` - ProgressReporter implementation
pub struct CollectBomUseCase<FT, CR, PR> {
    registry: CollectorRegistry,
    file_tree: FT,
    cpe_resolver: CR,
    progress_reporter: PR,
    cancel: CancellationToken,
    parallelism: usize,
}

impl<FT, CR, PR> CollectBomUseCase<FT, CR, PR>
where
    FT: FileTree,
    CR: CpeResolver,
    PR: ProgressReporter,
{
    /// Creates a new CollectBomUseCase with injected dependencies
    pub fn new(
        registry: CollectorRegistry,
        file_tree: FT,
        cpe_resolver: CR,
        progress_reporter: PR,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            registry,
            file_tree,
            cpe_resolver,
            progress_reporter,
            cancel,
            parallelism: DEFAULT_PARALLELISM,
        }
    }

    /// Caps how many generation jobs run at once; zero is treated as one
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    /// Executes the collection pipeline for one repository
    ///
    /// # Returns
    /// `CollectOutcome::Collected` with the merged BOM, or
    /// `CollectOutcome::UnsupportedRepository` when no collector produced
    /// anything.
    ///
    /// # Errors
    /// Returns an error if:
    /// - An exclusion pattern is invalid
    /// - The run was cancelled (`SbomError::Cancelled`); merge is skipped
    /// - Merging was rejected (`SbomError::MergeRejected`)
    pub async fn execute(&self, request: CollectRequest) -> Result<CollectOutcome> {
        let repository_root = request.repository_root.as_path();
        let mut summary = RunSummary {
            collectors_attempted: self.registry.len(),
            ..Default::default()
        };

        // Step 1: Discover project roots per collector
        self.enter(PipelineStage::Discover, repository_root);
        let finder =
            RootFinder::new().with_exclusions(PathFilter::new(request.exclude_paths.clone())?);
        let discovered = self.discover(&finder, repository_root, &mut summary)?;
        self.warn_unmatched_exclusions(finder.exclusions());

        // Step 2: Bootstrap missing lock data
        self.enter(PipelineStage::Bootstrap, repository_root);
        let jobs = self.bootstrap(discovered, &mut summary).await?;

        // Step 3: Generate partial BOMs
        self.enter(PipelineStage::Generate, repository_root);
        let boms = self.generate(jobs, repository_root, &mut summary).await?;
        summary.boms_collected = boms.len();

        if boms.is_empty() {
            self.progress_reporter.report_error(&format!(
                "⚠️  No collector produced a BOM for {}",
                repository_root.display()
            ));
            info!(root = %repository_root.display(), "unsupported repository");
            return Ok(CollectOutcome::UnsupportedRepository { summary });
        }

        // Step 4: Merge
        self.check_cancelled()?;
        self.enter(PipelineStage::Merge, repository_root);
        let merged = BomMerger::merge(&boms)?;

        // Step 5: Post-process
        self.enter(PipelineStage::Filter, repository_root);
        let bom = self.post_process(merged, &request);
        summary.merged_components = bom.component_count();

        self.enter(PipelineStage::Done, repository_root);
        self.progress_reporter
            .report_completion(&format!("✅ Collected {}", summary));

        Ok(CollectOutcome::Collected { bom, summary })
    }

    fn enter(&self, stage: PipelineStage, repository_root: &Path) {
        debug!(%stage, root = %repository_root.display(), "entering stage");
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(SbomError::Cancelled.into());
        }
        Ok(())
    }

    /// Finds project roots for every per-project collector
    ///
    /// Discovery failures are contained: the collector is skipped.
    fn discover(
        &self,
        finder: &RootFinder,
        repository_root: &Path,
        summary: &mut RunSummary,
    ) -> Result<Vec<GenerationJob>> {
        let mut jobs = Vec::new();

        for collector in self.registry.iter() {
            self.check_cancelled()?;
            match collector {
                Collector::Repository(c) => jobs.push(GenerationJob::Repository(c.clone())),
                Collector::Project(c) => {
                    match self.discover_roots(finder, repository_root, c.as_ref()) {
                        Ok(roots) => {
                            summary.roots_discovered += roots.len();
                            self.progress_reporter.report(&format!(
                                "🔎 {}: {} project root(s)",
                                c.name(),
                                roots.len()
                            ));
                            jobs.extend(
                                roots
                                    .into_iter()
                                    .map(|r| GenerationJob::Project(c.clone(), r)),
                            );
                        }
                        Err(e @ SbomError::NoRootsFound { .. }) => {
                            debug!(collector = c.name(), "{}", e);
                        }
                        Err(e) => {
                            warn!(collector = c.name(), error = %e, "root discovery failed");
                            self.progress_reporter
                                .report_error(&format!("⚠️  {}", e));
                        }
                    }
                }
            }
        }

        Ok(jobs)
    }

    fn discover_roots(
        &self,
        finder: &RootFinder,
        repository_root: &Path,
        collector: &dyn ProjectCollector,
    ) -> std::result::Result<Vec<ProjectRoot>, SbomError> {
        let name = collector.name();
        let relative = finder.discover(&self.file_tree, repository_root, name, |is_dir, path| {
            collector.matches(is_dir, path)
        })?;
        let markers = RootFinder::to_absolute(repository_root, relative, name)?;
        for marker in &markers {
            debug!(collector = marker.collector(), path = %marker.path().display(), "marker found");
        }
        Ok(PathReducer::reduce(collector.reduction(), &markers))
    }

    fn warn_unmatched_exclusions(&self, exclusions: &PathFilter) {
        for pattern in exclusions.unmatched_patterns() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Exclude pattern '{}' did not match any path.",
                pattern
            ));
        }
    }

    /// Bootstraps every project root, dropping the ones that fail
    async fn bootstrap(
        &self,
        jobs: Vec<GenerationJob>,
        summary: &mut RunSummary,
    ) -> Result<Vec<GenerationJob>> {
        let mut ready = Vec::with_capacity(jobs.len());

        for job in jobs {
            self.check_cancelled()?;
            let GenerationJob::Project(collector, root) = job else {
                ready.push(job);
                continue;
            };

            match collector.bootstrap(&root).await {
                Ok(bootstrapped) => ready.push(GenerationJob::Project(collector, bootstrapped)),
                Err(e) if is_cancellation(&e) => return Err(e),
                Err(e) => {
                    let details = format!("{:#}", e);
                    warn!(
                        collector = collector.name(),
                        root = %root.directory().display(),
                        error = %details,
                        "bootstrap failed, dropping root"
                    );
                    let failure = SbomError::BootstrapFailed {
                        collector: collector.name().to_string(),
                        root: root.directory().to_path_buf(),
                        details,
                    };
                    self.progress_reporter.report_error(&format!("⚠️  {}", failure));
                    summary.roots_dropped += 1;
                }
            }
        }

        Ok(ready)
    }

    /// Runs every generation job and returns the BOMs in job order
    ///
    /// Jobs run concurrently; this returns only once all of them finished.
    async fn generate(
        &self,
        jobs: Vec<GenerationJob>,
        repository_root: &Path,
        summary: &mut RunSummary,
    ) -> Result<Vec<Bom>> {
        let total = jobs.len();
        if total == 0 {
            return Ok(Vec::new());
        }
        self.progress_reporter
            .report(&format!("⚙️  Running {} generation job(s)...", total));

        let mut completed = 0usize;
        let pending = stream::iter(jobs.iter().enumerate())
            .map(|(idx, job)| async move { (idx, job.run(repository_root).await) })
            .buffer_unordered(self.parallelism)
            .inspect(|(idx, _)| {
                completed += 1;
                self.progress_reporter.report_progress(
                    completed,
                    total,
                    Some(jobs[*idx].collector()),
                );
            })
            .collect::<Vec<_>>();

        let mut results = tokio::select! {
            _ = self.cancel.cancelled() => return Err(SbomError::Cancelled.into()),
            results = pending => results,
        };
        results.sort_by_key(|(idx, _)| *idx);

        let mut boms = Vec::with_capacity(results.len());
        for (idx, result) in results {
            let job = &jobs[idx];
            match result {
                Ok(bom) => boms.push(bom),
                Err(e) if is_cancellation(&e) => return Err(e),
                Err(e) => {
                    summary.generation_failures += 1;
                    let failure = generation_failure(job, repository_root, e);
                    warn!(
                        collector = job.collector(),
                        root = %job.root(repository_root).display(),
                        error = %failure,
                        "generation failed, skipping root"
                    );
                    self.progress_reporter.report_error(&format!("⚠️  {}", failure));
                }
            }
        }

        Ok(boms)
    }

    fn post_process(&self, bom: Bom, request: &CollectRequest) -> Bom {
        let mut bom = match request.exclude_scope {
            Some(scope) => {
                let before = bom.component_count();
                let filtered = ScopeFilter::apply(bom, scope);
                debug!(
                    %scope,
                    removed = before - filtered.component_count(),
                    "applied scope filter"
                );
                filtered
            }
            None => bom,
        };

        if request.attach_cpe {
            bom = CpeAttacher::attach(bom, &self.cpe_resolver);
        }

        for tag in &request.tags {
            let property = Property::new(TAG_PROPERTY, tag.as_str());
            if !bom.metadata.properties.contains(&property) {
                bom.metadata.properties.push(property);
            }
        }

        bom
    }
}

fn is_cancellation(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<SbomError>()
        .is_some_and(SbomError::is_cancelled)
}

/// Wraps a contained generation error in the typed failure, unless the
/// collector already reported one
fn generation_failure(
    job: &GenerationJob,
    repository_root: &Path,
    error: anyhow::Error,
) -> SbomError {
    match error.downcast::<SbomError>() {
        Ok(typed @ SbomError::GenerationFailed { .. }) => typed,
        Ok(other) => SbomError::GenerationFailed {
            collector: job.collector().to_string(),
            root: PathBuf::from(job.root(repository_root)),
            details: other.to_string(),
        },
        Err(untyped) => SbomError::GenerationFailed {
            collector: job.collector().to_string(),
            root: PathBuf::from(job.root(repository_root)),
            details: format!("{:#}", untyped),
        },
    }
}
