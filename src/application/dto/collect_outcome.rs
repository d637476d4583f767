use crate::inventory::domain::Bom;

/// Counters describing one repository run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub collectors_attempted: usize,
    pub roots_discovered: usize,
    pub roots_dropped: usize,
    pub generation_failures: usize,
    pub boms_collected: usize,
    pub merged_components: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} collector(s), {} root(s) discovered, {} dropped in bootstrap, \
             {} generation failure(s), {} BOM(s) collected, {} component(s) merged",
            self.collectors_attempted,
            self.roots_discovered,
            self.roots_dropped,
            self.generation_failures,
            self.boms_collected,
            self.merged_components
        )
    }
}

/// Result of collecting one repository
///
/// Callers must branch on the variant: an unsupported repository is a
/// normal outcome, not a success with an empty BOM.
#[derive(Debug, Clone)]
pub enum CollectOutcome {
    Collected { bom: Bom, summary: RunSummary },
    /// No collector produced a BOM for any root
    UnsupportedRepository { summary: RunSummary },
}

impl CollectOutcome {
    pub fn summary(&self) -> &RunSummary {
        match self {
            CollectOutcome::Collected { summary, .. } => summary,
            CollectOutcome::UnsupportedRepository { summary } => summary,
        }
    }

    pub fn bom(&self) -> Option<&Bom> {
        match self {
            CollectOutcome::Collected { bom, .. } => Some(bom),
            CollectOutcome::UnsupportedRepository { .. } => None,
        }
    }

    pub fn into_bom(self) -> Option<Bom> {
        match self {
            CollectOutcome::Collected { bom, .. } => Some(bom),
            CollectOutcome::UnsupportedRepository { .. } => None,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, CollectOutcome::UnsupportedRepository { .. })
    }
}
