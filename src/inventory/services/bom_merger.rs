use super::metadata_generator::{BomHeader, MetadataGenerator};
use crate::inventory::domain::{
    normalize_name, normalize_purl, Bom, Component, ComponentType, SPEC_VERSION,
};
use crate::shared::error::SbomError;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// A normalized component together with the index of the BOM it came from
#[derive(Debug, Clone)]
struct SourcedComponent {
    source: usize,
    component: Component,
}

/// Identity used to group components across BOMs
///
/// Components without a package URL cannot be reconciled by identity; they
/// are only merged with exact type/name/version twins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Purl(String),
    Anonymous {
        component_type: ComponentType,
        name: String,
        version: Option<String>,
    },
}

impl GroupKey {
    fn of(component: &Component) -> Self {
        match component.purl() {
            Some(purl) if !purl.is_empty() => GroupKey::Purl(purl.to_string()),
            _ => GroupKey::Anonymous {
                component_type: component.component_type.clone(),
                name: component.name.clone(),
                version: component.version.clone(),
            },
        }
    }
}

/// BomMerger reconciles partial BOMs into one canonical BOM
///
/// Each stage hands an independently owned collection to the next: inputs
/// are only ever read, and the returned BOM shares no storage with them.
pub struct BomMerger;

impl BomMerger {
    /// Merges partial BOMs into a freshly stamped BOM
    ///
    /// # Errors
    /// Returns `SbomError::MergeRejected` when `boms` is empty.
    pub fn merge(boms: &[Bom]) -> Result<Bom, SbomError> {
        Self::merge_with_header(boms, MetadataGenerator::generate_default())
    }

    /// Merges partial BOMs using a caller-supplied serial number and metadata
    pub fn merge_with_header(boms: &[Bom], header: BomHeader) -> Result<Bom, SbomError> {
        if boms.is_empty() {
            return Err(SbomError::MergeRejected {
                reason: "no BOMs were supplied".to_string(),
            });
        }

        let flattened = Self::flatten(boms);
        let groups = Self::group(flattened);
        let mut components: Vec<Component> = groups.into_iter().map(Self::merge_group).collect();
        components.sort_by(|a, b| {
            let key_a = (a.purl().unwrap_or_default(), &a.name, &a.version);
            let key_b = (b.purl().unwrap_or_default(), &b.name, &b.version);
            key_a.cmp(&key_b)
        });

        // First non-empty wins; graphs from different generators are not unioned
        let dependencies = boms
            .iter()
            .map(|b| &b.dependencies)
            .find(|d| !d.is_empty())
            .cloned()
            .unwrap_or_default();
        let external_references = boms
            .iter()
            .map(|b| &b.external_references)
            .find(|r| !r.is_empty())
            .cloned()
            .unwrap_or_default();

        debug!(
            inputs = boms.len(),
            components = components.len(),
            dependencies = dependencies.len(),
            "merged BOMs"
        );

        Ok(Bom {
            spec_version: SPEC_VERSION.to_string(),
            serial_number: Some(header.serial_number),
            version: 1,
            metadata: header.metadata,
            components,
            dependencies,
            external_references,
        })
    }

    /// Returns a normalized copy of `component`
    ///
    /// Application components are copied unchanged: their package URL is not
    /// a dependable identity key.
    pub fn normalize_component(component: &Component) -> Component {
        let mut normalized = component.clone();
        if component.is_application() {
            return normalized;
        }
        normalized.purl = component
            .purl()
            .filter(|p| !p.is_empty())
            .map(normalize_purl);
        normalized.name = normalize_name(&component.name);
        normalized
    }

    fn flatten(boms: &[Bom]) -> Vec<SourcedComponent> {
        boms.iter()
            .enumerate()
            .flat_map(|(source, bom)| {
                bom.components.iter().map(move |c| SourcedComponent {
                    source,
                    component: Self::normalize_component(c),
                })
            })
            .collect()
    }

    /// Groups by identity, keeping groups in first-seen order
    fn group(flattened: Vec<SourcedComponent>) -> Vec<Vec<SourcedComponent>> {
        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        let mut groups: Vec<Vec<SourcedComponent>> = Vec::new();

        for sourced in flattened {
            let key = GroupKey::of(&sourced.component);
            match index.get(&key) {
                Some(&idx) => groups[idx].push(sourced),
                None => {
                    index.insert(key, groups.len());
                    groups.push(vec![sourced]);
                }
            }
        }

        groups
    }

    fn merge_group(group: Vec<SourcedComponent>) -> Component {
        let mut members = group.into_iter();
        let Some(first) = members.next() else {
            return Component::default();
        };
        let rest: Vec<SourcedComponent> = members.collect();

        if !first.component.is_library() || rest.is_empty() {
            return first.component;
        }

        let sources: BTreeSet<usize> = std::iter::once(first.source)
            .chain(rest.iter().map(|s| s.source))
            .collect();
        debug!(
            purl = first.component.purl().unwrap_or_default(),
            occurrences = rest.len() + 1,
            sources = sources.len(),
            "merging duplicate component"
        );

        let mut merged = first.component;
        for sourced in rest {
            Self::absorb(&mut merged, sourced.component);
        }
        merged
    }

    /// Folds `next` into `merged`: scalars take the last non-empty value,
    /// lists take the order-preserving union
    fn absorb(merged: &mut Component, next: Component) {
        merged.component_type = next.component_type;
        if !next.name.is_empty() {
            merged.name = next.name;
        }
        take_if_present(&mut merged.version, next.version);
        take_if_present(&mut merged.description, next.description);
        take_if_present(&mut merged.cpe, next.cpe);
        take_if_present(&mut merged.purl, next.purl);
        if next.scope.is_some() {
            merged.scope = next.scope;
        }
        if merged.bom_ref.as_deref().map_or(true, str::is_empty) {
            merged.bom_ref = next.bom_ref;
        }

        union_into(&mut merged.hashes, next.hashes);
        union_into(&mut merged.licenses, next.licenses);
        union_into(&mut merged.properties, next.properties);
        union_into(&mut merged.external_references, next.external_references);
    }
}

fn take_if_present(slot: &mut Option<String>, candidate: Option<String>) {
    if let Some(value) = candidate.filter(|v| !v.is_empty()) {
        *slot = Some(value);
    }
}

fn union_into<T: PartialEq>(target: &mut Vec<T>, items: Vec<T>) {
    for item in items {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::domain::{
        Dependency, ExternalReference, Hash, LicenseChoice, Property, Scope,
    };
    use std::collections::HashSet;

    fn lib(purl: &str) -> Component {
        let name = purl.rsplit('/').next().unwrap_or(purl);
        Component::library(name, "1.0.0", purl)
    }

    fn bom_of(purls: &[&str]) -> Bom {
        Bom::with_components(purls.iter().map(|p| lib(p)).collect())
    }

    fn purls(bom: &Bom) -> Vec<String> {
        bom.components
            .iter()
            .map(|c| c.purl().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_merge_rejects_empty_input() {
        let err = BomMerger::merge(&[]).unwrap_err();
        assert!(matches!(err, SbomError::MergeRejected { .. }));
    }

    #[test]
    fn test_merge_union_is_sorted_and_unique() {
        let a = "pkg:npm/a@1.0.0";
        let b = "pkg:npm/b@1.0.0";
        let c = "pkg:npm/c@1.0.0";
        let d = "pkg:npm/d@1.0.0";

        let merged =
            BomMerger::merge(&[bom_of(&[a, b]), bom_of(&[c]), bom_of(&[c, b, d])]).unwrap();

        assert_eq!(purls(&merged), vec![a, b, c, d]);
    }

    #[test]
    fn test_merge_output_has_unique_normalized_purls() {
        let merged = BomMerger::merge(&[
            bom_of(&["pkg:npm/%40actions/core@1.10.0", "pkg:gem/rake@13.0.6"]),
            bom_of(&[
                "pkg:npm/actions/core@1.10.0?vcs_url=x",
                "PKG:gem/rake@13.0.6#lib",
            ]),
        ])
        .unwrap();

        let all = purls(&merged);
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), unique.len());
        assert_eq!(all, vec!["pkg:gem/rake@13.0.6", "pkg:npm/actions/core@1.10.0"]);
    }

    #[test]
    fn test_license_union_keeps_information() {
        let mut with_license = Component::library("rake", "13.0.6", "pkg:gem/rake@13.0.6");
        with_license.licenses = vec![LicenseChoice::spdx("MIT")];
        let without_license = Component::library("rake", "13.0.6", "pkg:gem/rake@13.0.6");

        let merged = BomMerger::merge(&[
            Bom::with_components(vec![with_license]),
            Bom::with_components(vec![without_license]),
        ])
        .unwrap();

        assert_eq!(merged.components.len(), 1);
        assert_eq!(merged.components[0].licenses, vec![LicenseChoice::spdx("MIT")]);
    }

    #[test]
    fn test_duplicate_input_is_idempotent() {
        let first = bom_of(&["pkg:cargo/serde@1.0.0", "pkg:cargo/anyhow@1.0.0"]);
        let second = bom_of(&["pkg:cargo/tokio@1.0.0"]);

        let once = BomMerger::merge(&[first.clone(), second.clone()]).unwrap();
        let twice = BomMerger::merge(&[first.clone(), second, first]).unwrap();

        assert_eq!(once.components, twice.components);
    }

    #[test]
    fn test_scoped_name_is_normalized() {
        let component = Component::library("@actions/core", "1.10.0", "pkg:npm/%40actions/core@1.10.0");
        let merged = BomMerger::merge(&[Bom::with_components(vec![component])]).unwrap();

        assert_eq!(merged.components[0].name, "actions/core");
        assert_eq!(
            merged.components[0].purl(),
            Some("pkg:npm/actions/core@1.10.0")
        );
    }

    #[test]
    fn test_application_components_are_not_normalized() {
        let mut app = Component::library("@corp/app", "2.0.0", "pkg:npm/%40corp/app@2.0.0");
        app.component_type = ComponentType::Application;

        let normalized = BomMerger::normalize_component(&app);

        assert_eq!(normalized, app);
    }

    #[test]
    fn test_scalars_take_last_non_empty_value() {
        let mut first = lib("pkg:pypi/requests@2.31.0");
        first.description = Some("HTTP library".to_string());
        first.cpe = Some("cpe:2.3:a:python:requests:2.31.0:*:*:*:*:*:*:*".to_string());
        first.bom_ref = Some("ref-one".to_string());
        let mut second = lib("pkg:pypi/requests@2.31.0");
        second.description = Some("Python HTTP for Humans.".to_string());
        second.cpe = None;
        second.scope = Some(Scope::Required);
        second.bom_ref = Some("ref-two".to_string());

        let merged = BomMerger::merge(&[
            Bom::with_components(vec![first]),
            Bom::with_components(vec![second]),
        ])
        .unwrap();
        let component = &merged.components[0];

        assert_eq!(component.description.as_deref(), Some("Python HTTP for Humans."));
        assert_eq!(
            component.cpe.as_deref(),
            Some("cpe:2.3:a:python:requests:2.31.0:*:*:*:*:*:*:*")
        );
        assert_eq!(component.scope, Some(Scope::Required));
        assert_eq!(component.bom_ref.as_deref(), Some("ref-one"));
    }

    #[test]
    fn test_lists_union_in_first_seen_order() {
        let sha = Hash {
            alg: "SHA-256".to_string(),
            content: "abc".to_string(),
        };
        let md5 = Hash {
            alg: "MD5".to_string(),
            content: "def".to_string(),
        };
        let vcs = ExternalReference {
            reference_type: "vcs".to_string(),
            url: "https://github.com/psf/requests".to_string(),
            comment: None,
        };

        let mut first = lib("pkg:pypi/requests@2.31.0");
        first.hashes = vec![sha.clone()];
        first.properties = vec![Property::new("source", "uv.lock")];
        let mut second = lib("pkg:pypi/requests@2.31.0");
        second.hashes = vec![md5.clone(), sha.clone()];
        second.properties = vec![Property::new("source", "requirements.txt")];
        second.external_references = vec![vcs.clone()];

        let merged = BomMerger::merge(&[
            Bom::with_components(vec![first]),
            Bom::with_components(vec![second]),
        ])
        .unwrap();
        let component = &merged.components[0];

        assert_eq!(component.hashes, vec![sha, md5]);
        assert_eq!(
            component.properties,
            vec![
                Property::new("source", "uv.lock"),
                Property::new("source", "requirements.txt")
            ]
        );
        assert_eq!(component.external_references, vec![vcs]);
    }

    #[test]
    fn test_non_library_group_keeps_first_occurrence() {
        let mut first = lib("pkg:docker/nginx@1.25");
        first.component_type = ComponentType::Container;
        first.description = Some("first".to_string());
        let mut second = first.clone();
        second.description = Some("second".to_string());

        let merged = BomMerger::merge(&[
            Bom::with_components(vec![first]),
            Bom::with_components(vec![second]),
        ])
        .unwrap();

        assert_eq!(merged.components.len(), 1);
        assert_eq!(merged.components[0].description.as_deref(), Some("first"));
    }

    #[test]
    fn test_components_without_purl_are_not_collapsed() {
        let mut one = Component::library("left", "1.0.0", "");
        one.purl = None;
        let mut two = Component::library("right", "1.0.0", "");
        two.purl = None;

        let merged = BomMerger::merge(&[Bom::with_components(vec![one, two])]).unwrap();

        assert_eq!(merged.components.len(), 2);
    }

    #[test]
    fn test_dependency_graph_and_references_first_non_empty_wins() {
        let mut first = bom_of(&["pkg:npm/a@1.0.0"]);
        first.external_references = vec![ExternalReference {
            reference_type: "website".to_string(),
            url: "https://example.com".to_string(),
            comment: None,
        }];
        let mut second = bom_of(&["pkg:npm/b@1.0.0"]);
        second.dependencies = vec![Dependency {
            reference: "pkg:npm/b@1.0.0".to_string(),
            depends_on: vec![],
        }];
        let mut third = bom_of(&["pkg:npm/c@1.0.0"]);
        third.dependencies = vec![Dependency {
            reference: "pkg:npm/c@1.0.0".to_string(),
            depends_on: vec!["pkg:npm/a@1.0.0".to_string()],
        }];

        let merged = BomMerger::merge(&[first.clone(), second.clone(), third]).unwrap();

        assert_eq!(merged.dependencies, second.dependencies);
        assert_eq!(merged.external_references, first.external_references);
    }

    #[test]
    fn test_merge_produces_fresh_identity_and_leaves_inputs_untouched() {
        let mut input = bom_of(&["pkg:npm/%40scope/pkg@1.0.0"]);
        input.serial_number = Some("urn:uuid:input".to_string());
        let snapshot = input.clone();

        let merged = BomMerger::merge(std::slice::from_ref(&input)).unwrap();

        assert_eq!(input, snapshot);
        assert_ne!(merged.serial_number, input.serial_number);
        assert_eq!(merged.metadata.tools[0].name, "bom-harvest");
        assert_eq!(merged.spec_version, SPEC_VERSION);
    }
}
