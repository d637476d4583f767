use crate::inventory::domain::{Bom, Scope};

/// ScopeFilter removes components of one CycloneDX scope from a BOM
pub struct ScopeFilter;

impl ScopeFilter {
    /// Returns `bom` without the components whose scope equals `excluded`
    ///
    /// Components with no scope are kept. A BOM without components is
    /// returned unchanged.
    pub fn apply(bom: Bom, excluded: Scope) -> Bom {
        if !bom.has_components() {
            return bom;
        }

        let kept = bom
            .components
            .iter()
            .filter(|c| c.scope != Some(excluded))
            .cloned()
            .collect();

        Bom {
            components: kept,
            ..bom
        }
    }
}
