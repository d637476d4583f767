use crate::application::dto::BomFormat;
use crate::inventory::domain::{
    Bom, BomMetadata, Component, ComponentType, Dependency, ExternalReference, Hash, License,
    LicenseChoice, Property, Tool, SPEC_VERSION,
};
use crate::ports::outbound::BomCodec;
use crate::shared::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

fn namespace() -> String {
    format!("http://cyclonedx.org/schema/bom/{}", SPEC_VERSION)
}

fn default_version() -> u32 {
    1
}

// Attribute fields come first: quick-xml writes them onto the start tag.

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "bom")]
struct XmlBom {
    #[serde(rename = "@xmlns", default)]
    xmlns: String,
    #[serde(
        rename = "@serialNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    serial_number: Option<String>,
    #[serde(rename = "@version", default = "default_version")]
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<XmlMetadata>,
    #[serde(default)]
    components: XmlComponents,
    #[serde(rename = "externalReferences", default, skip_serializing_if = "XmlReferences::is_empty")]
    external_references: XmlReferences,
    #[serde(default, skip_serializing_if = "XmlDependencies::is_empty")]
    dependencies: XmlDependencies,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct XmlMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tools: Option<XmlTools>,
    #[serde(default, skip_serializing_if = "XmlProperties::is_empty")]
    properties: XmlProperties,
}

/// Holds either legacy `<tool>` entries or 1.5 `<components>`
#[derive(Debug, Default, Serialize, Deserialize)]
struct XmlTools {
    #[serde(rename = "tool", default, skip_serializing_if = "Vec::is_empty")]
    legacy: Vec<XmlLegacyTool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    components: Option<XmlToolComponents>,
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlLegacyTool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vendor: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct XmlToolComponents {
    #[serde(rename = "component", default)]
    items: Vec<XmlToolComponent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlToolComponent {
    #[serde(rename = "@type", default)]
    component_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct XmlComponents {
    #[serde(rename = "component", default)]
    items: Vec<XmlComponent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlComponent {
    #[serde(rename = "@type", default)]
    component_type: String,
    #[serde(rename = "@bom-ref", default, skip_serializing_if = "Option::is_none")]
    bom_ref: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
    #[serde(default, skip_serializing_if = "XmlHashes::is_empty")]
    hashes: XmlHashes,
    #[serde(default, skip_serializing_if = "XmlLicenses::is_empty")]
    licenses: XmlLicenses,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cpe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    purl: Option<String>,
    #[serde(
        rename = "externalReferences",
        default,
        skip_serializing_if = "XmlReferences::is_empty"
    )]
    external_references: XmlReferences,
    #[serde(default, skip_serializing_if = "XmlProperties::is_empty")]
    properties: XmlProperties,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct XmlHashes {
    #[serde(rename = "hash", default)]
    items: Vec<XmlHash>,
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlHash {
    #[serde(rename = "@alg")]
    alg: String,
    #[serde(rename = "$text", default)]
    content: String,
}

/// Child elements of `<licenses>` in document order
#[derive(Debug, Default, Serialize, Deserialize)]
struct XmlLicenses {
    #[serde(rename = "$value", default)]
    items: Vec<XmlLicenseChoice>,
}

#[derive(Debug, Serialize, Deserialize)]
enum XmlLicenseChoice {
    #[serde(rename = "license")]
    License(XmlLicense),
    #[serde(rename = "expression")]
    Expression(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlLicense {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct XmlProperties {
    #[serde(rename = "property", default)]
    items: Vec<XmlProperty>,
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlProperty {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct XmlReferences {
    #[serde(rename = "reference", default)]
    items: Vec<XmlReference>,
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlReference {
    #[serde(rename = "@type")]
    reference_type: String,
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct XmlDependencies {
    #[serde(rename = "dependency", default)]
    items: Vec<XmlDependency>,
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlDependency {
    #[serde(rename = "@ref")]
    reference: String,
    #[serde(rename = "dependency", default, skip_serializing_if = "Vec::is_empty")]
    depends_on: Vec<XmlDependencyRef>,
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlDependencyRef {
    #[serde(rename = "@ref")]
    reference: String,
}

macro_rules! wrapper_is_empty {
    ($($wrapper:ty => $field:ident),* $(,)?) => {
        $(impl $wrapper {
            fn is_empty(&self) -> bool {
                self.$field.is_empty()
            }
        })*
    };
}

wrapper_is_empty!(
    XmlHashes => items,
    XmlProperties => items,
    XmlReferences => items,
    XmlDependencies => items,
);

impl XmlLicenses {
    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<XmlBom> for Bom {
    fn from(xml: XmlBom) -> Self {
        let metadata = xml.metadata.unwrap_or_default();
        let tools = metadata.tools.unwrap_or_default();
        let legacy = tools.legacy.into_iter().map(|t| Tool {
            vendor: t.vendor,
            name: t.name,
            version: t.version,
        });
        let structured = tools
            .components
            .unwrap_or_default()
            .items
            .into_iter()
            .map(|t| Tool {
                vendor: t.publisher.or(t.group),
                name: t.name,
                version: t.version,
            });

        Bom {
            spec_version: spec_version_of(&xml.xmlns),
            serial_number: xml.serial_number,
            version: xml.version,
            metadata: BomMetadata {
                timestamp: metadata.timestamp,
                tools: legacy.chain(structured).collect(),
                properties: metadata.properties.into_domain(),
            },
            components: xml.components.items.into_iter().map(Into::into).collect(),
            dependencies: xml
                .dependencies
                .items
                .into_iter()
                .map(|d| Dependency {
                    reference: d.reference,
                    depends_on: d.depends_on.into_iter().map(|r| r.reference).collect(),
                })
                .collect(),
            external_references: xml.external_references.into_domain(),
        }
    }
}

/// Reads the schema version from the default namespace, e.g. ".../bom/1.4"
fn spec_version_of(xmlns: &str) -> String {
    xmlns
        .rsplit('/')
        .next()
        .filter(|v| !v.is_empty() && v.chars().all(|c| c.is_ascii_digit() || c == '.'))
        .unwrap_or(SPEC_VERSION)
        .to_string()
}

impl From<XmlComponent> for Component {
    fn from(xml: XmlComponent) -> Self {
        let licenses = xml
            .licenses
            .items
            .into_iter()
            .map(|choice| match choice {
                XmlLicenseChoice::License(l) => LicenseChoice::License(License {
                    id: l.id,
                    name: l.name,
                    url: l.url,
                }),
                XmlLicenseChoice::Expression(e) => LicenseChoice::Expression(e),
            })
            .collect();

        Component {
            component_type: ComponentType::parse(&xml.component_type),
            bom_ref: xml.bom_ref,
            name: xml.name,
            version: xml.version,
            description: xml.description,
            scope: xml.scope.and_then(|s| s.parse().ok()),
            purl: xml.purl,
            cpe: xml.cpe,
            hashes: xml
                .hashes
                .items
                .into_iter()
                .map(|h| Hash {
                    alg: h.alg,
                    content: h.content.trim().to_string(),
                })
                .collect(),
            licenses,
            properties: xml.properties.into_domain(),
            external_references: xml.external_references.into_domain(),
        }
    }
}

impl XmlProperties {
    fn into_domain(self) -> Vec<Property> {
        self.items
            .into_iter()
            .map(|p| Property::new(p.name, p.value))
            .collect()
    }

    fn from_domain(properties: &[Property]) -> Self {
        Self {
            items: properties
                .iter()
                .map(|p| XmlProperty {
                    name: p.name.clone(),
                    value: p.value.clone(),
                })
                .collect(),
        }
    }
}

impl XmlReferences {
    fn into_domain(self) -> Vec<ExternalReference> {
        self.items
            .into_iter()
            .map(|r| ExternalReference {
                reference_type: r.reference_type,
                url: r.url,
                comment: r.comment,
            })
            .collect()
    }

    fn from_domain(references: &[ExternalReference]) -> Self {
        Self {
            items: references
                .iter()
                .map(|r| XmlReference {
                    reference_type: r.reference_type.clone(),
                    url: r.url.clone(),
                    comment: r.comment.clone(),
                })
                .collect(),
        }
    }
}

impl From<&Bom> for XmlBom {
    fn from(bom: &Bom) -> Self {
        let metadata = &bom.metadata;
        let has_metadata = metadata.timestamp.is_some()
            || !metadata.tools.is_empty()
            || !metadata.properties.is_empty();

        XmlBom {
            xmlns: namespace(),
            serial_number: bom.serial_number.clone(),
            version: bom.version,
            metadata: has_metadata.then(|| XmlMetadata {
                timestamp: metadata.timestamp.clone(),
                tools: (!metadata.tools.is_empty()).then(|| XmlTools {
                    legacy: Vec::new(),
                    components: Some(XmlToolComponents {
                        items: metadata
                            .tools
                            .iter()
                            .map(|t| XmlToolComponent {
                                component_type: ComponentType::Application.as_str().to_string(),
                                publisher: t.vendor.clone(),
                                group: None,
                                name: t.name.clone(),
                                version: t.version.clone(),
                            })
                            .collect(),
                    }),
                }),
                properties: XmlProperties::from_domain(&metadata.properties),
            }),
            components: XmlComponents {
                items: bom.components.iter().map(Into::into).collect(),
            },
            external_references: XmlReferences::from_domain(&bom.external_references),
            dependencies: XmlDependencies {
                items: bom
                    .dependencies
                    .iter()
                    .map(|d| XmlDependency {
                        reference: d.reference.clone(),
                        depends_on: d
                            .depends_on
                            .iter()
                            .map(|r| XmlDependencyRef {
                                reference: r.clone(),
                            })
                            .collect(),
                    })
                    .collect(),
            },
        }
    }
}

impl From<&Component> for XmlComponent {
    fn from(component: &Component) -> Self {
        let licenses = XmlLicenses {
            items: component
                .licenses
                .iter()
                .map(|choice| match choice {
                    LicenseChoice::License(l) => XmlLicenseChoice::License(XmlLicense {
                        id: l.id.clone(),
                        name: l.name.clone(),
                        url: l.url.clone(),
                    }),
                    LicenseChoice::Expression(e) => XmlLicenseChoice::Expression(e.clone()),
                })
                .collect(),
        };

        XmlComponent {
            component_type: component.component_type.as_str().to_string(),
            bom_ref: component.bom_ref.clone(),
            name: component.name.clone(),
            version: component.version.clone(),
            description: component.description.clone(),
            scope: component.scope.map(|s| s.as_str().to_string()),
            hashes: XmlHashes {
                items: component
                    .hashes
                    .iter()
                    .map(|h| XmlHash {
                        alg: h.alg.clone(),
                        content: h.content.clone(),
                    })
                    .collect(),
            },
            licenses,
            cpe: component.cpe.clone(),
            purl: component.purl.clone(),
            external_references: XmlReferences::from_domain(&component.external_references),
            properties: XmlProperties::from_domain(&component.properties),
        }
    }
}

/// CycloneDxXmlCodec adapter for CycloneDX XML documents
#[derive(Debug, Default, Clone, Copy)]
pub struct CycloneDxXmlCodec;

impl CycloneDxXmlCodec {
    pub fn new() -> Self {
        Self
    }
}

impl BomCodec for CycloneDxXmlCodec {
    fn format(&self) -> BomFormat {
        BomFormat::Xml
    }

    fn decode(&self, bytes: &[u8]) -> Result<Bom> {
        let text = std::str::from_utf8(bytes).context("CycloneDX XML is not valid UTF-8")?;
        let xml: XmlBom =
            quick_xml::de::from_str(text).context("Failed to parse CycloneDX XML")?;
        Ok(xml.into())
    }

    fn encode(&self, bom: &Bom) -> Result<String> {
        let body = quick_xml::se::to_string(&XmlBom::from(bom))
            .context("Failed to serialize CycloneDX XML")?;
        Ok(format!("{}\n{}", XML_DECLARATION, body))
    }
}
