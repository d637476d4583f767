use crate::shared::error::SbomError;
use std::fmt;
use std::str::FromStr;

/// CycloneDX component classification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ComponentType {
    Application,
    Framework,
    #[default]
    Library,
    Container,
    Platform,
    OperatingSystem,
    Device,
    Firmware,
    File,
    Data,
    /// Any classification this crate does not model explicitly
    Other(String),
}

impl ComponentType {
    pub fn as_str(&self) -> &str {
        match self {
            ComponentType::Application => "application",
            ComponentType::Framework => "framework",
            ComponentType::Library => "library",
            ComponentType::Container => "container",
            ComponentType::Platform => "platform",
            ComponentType::OperatingSystem => "operating-system",
            ComponentType::Device => "device",
            ComponentType::Firmware => "firmware",
            ComponentType::File => "file",
            ComponentType::Data => "data",
            ComponentType::Other(s) => s,
        }
    }

    /// Parses a CycloneDX type string; a missing type means library and
    /// unknown values are kept verbatim
    pub fn parse(value: &str) -> Self {
        match value {
            "application" => ComponentType::Application,
            "framework" => ComponentType::Framework,
            "" | "library" => ComponentType::Library,
            "container" => ComponentType::Container,
            "platform" => ComponentType::Platform,
            "operating-system" => ComponentType::OperatingSystem,
            "device" => ComponentType::Device,
            "firmware" => ComponentType::Firmware,
            "file" => ComponentType::File,
            "data" => ComponentType::Data,
            other => ComponentType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// CycloneDX component scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Required,
    Optional,
    Excluded,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Required => "required",
            Scope::Optional => "optional",
            Scope::Excluded => "excluded",
        }
    }
}

impl FromStr for Scope {
    type Err = SbomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "required" => Ok(Scope::Required),
            "optional" => Ok(Scope::Optional),
            "excluded" => Ok(Scope::Excluded),
            _ => Err(SbomError::ConfigError {
                message: format!("Invalid scope: {}", s),
                hint: "Use one of 'required', 'optional' or 'excluded'".to_string(),
            }),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hash {
    pub alg: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct License {
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
}

/// A single entry of a component's license list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LicenseChoice {
    License(License),
    Expression(String),
}

impl LicenseChoice {
    /// Shorthand for an SPDX identifier license
    pub fn spdx(id: &str) -> Self {
        LicenseChoice::License(License {
            id: Some(id.to_string()),
            name: None,
            url: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalReference {
    pub reference_type: String,
    pub url: String,
    pub comment: Option<String>,
}

/// Component is a package identity record as reported by one generator
///
/// The package URL is the identity key used to reconcile components across
/// BOMs; list-valued fields keep first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Component {
    pub component_type: ComponentType,
    pub bom_ref: Option<String>,
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub scope: Option<Scope>,
    pub purl: Option<String>,
    pub cpe: Option<String>,
    pub hashes: Vec<Hash>,
    pub licenses: Vec<LicenseChoice>,
    pub properties: Vec<Property>,
    pub external_references: Vec<ExternalReference>,
}

impl Component {
    /// Creates a library component with a package URL and nothing else
    pub fn library(name: &str, version: &str, purl: &str) -> Self {
        Self {
            component_type: ComponentType::Library,
            name: name.to_string(),
            version: non_empty(version),
            purl: non_empty(purl),
            ..Default::default()
        }
    }

    pub fn purl(&self) -> Option<&str> {
        self.purl.as_deref()
    }

    pub fn is_library(&self) -> bool {
        self.component_type == ComponentType::Library
    }

    pub fn is_application(&self) -> bool {
        self.component_type == ComponentType::Application
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
