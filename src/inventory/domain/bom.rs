use super::{Component, ExternalReference, Property};

/// CycloneDX specification version emitted for merged BOMs
pub const SPEC_VERSION: &str = "1.5";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tool {
    pub vendor: Option<String>,
    pub name: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BomMetadata {
    pub timestamp: Option<String>,
    pub tools: Vec<Tool>,
    pub properties: Vec<Property>,
}

/// One node of the dependency graph, keyed by bom-ref
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub reference: String,
    pub depends_on: Vec<String>,
}

/// Bom aggregate: a decoded or merged CycloneDX document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bom {
    pub spec_version: String,
    pub serial_number: Option<String>,
    pub version: u32,
    pub metadata: BomMetadata,
    pub components: Vec<Component>,
    pub dependencies: Vec<Dependency>,
    pub external_references: Vec<ExternalReference>,
}

impl Default for Bom {
    fn default() -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            serial_number: None,
            version: 1,
            metadata: BomMetadata::default(),
            components: Vec::new(),
            dependencies: Vec::new(),
            external_references: Vec::new(),
        }
    }
}

impl Bom {
    /// Creates an otherwise empty BOM holding the given components
    pub fn with_components(components: Vec<Component>) -> Self {
        Self {
            components,
            ..Default::default()
        }
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn has_components(&self) -> bool {
        !self.components.is_empty()
    }
}
