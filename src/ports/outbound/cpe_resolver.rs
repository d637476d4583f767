use crate::inventory::domain::Component;

/// CpeResolver port: derives a CPE identifier for a component
pub trait CpeResolver: Send + Sync {
    /// Returns a CPE for `component`, or `None` when none can be derived
    fn resolve(&self, component: &Component) -> Option<String>;
}
