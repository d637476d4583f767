pub mod bom;
pub mod component;
pub mod package_url;
pub mod project_root;

pub use bom::{Bom, BomMetadata, Dependency, Tool, SPEC_VERSION};
pub use component::{
    Component, ComponentType, ExternalReference, Hash, License, LicenseChoice, Property, Scope,
};
pub use package_url::{normalize_name, normalize_purl};
pub use project_root::{MarkerFile, ProjectRoot};
