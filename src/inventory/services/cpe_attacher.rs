use crate::inventory::domain::Bom;
use crate::ports::outbound::CpeResolver;

/// CpeAttacher fills missing CPE identifiers through a [`CpeResolver`]
pub struct CpeAttacher;

impl CpeAttacher {
    /// Returns `bom` with a CPE on every component the resolver can derive
    /// one for. Existing CPEs are never replaced.
    pub fn attach(bom: Bom, resolver: &dyn CpeResolver) -> Bom {
        let components = bom
            .components
            .iter()
            .map(|component| {
                let mut updated = component.clone();
                if updated.cpe.as_deref().map_or(true, str::is_empty) {
                    updated.cpe = resolver.resolve(component);
                }
                updated
            })
            .collect();

        Bom { components, ..bom }
    }
}
