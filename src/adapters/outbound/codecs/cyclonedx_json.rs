use crate::application::dto::BomFormat;
use crate::inventory::domain::{
    Bom, BomMetadata, Component, ComponentType, Dependency, ExternalReference, Hash, License,
    LicenseChoice, Property, Tool, SPEC_VERSION,
};
use crate::ports::outbound::BomCodec;
use crate::shared::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};

const BOM_FORMAT: &str = "CycloneDX";

fn default_bom_format() -> String {
    BOM_FORMAT.to_string()
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonBom {
    #[serde(default = "default_bom_format")]
    bom_format: String,
    #[serde(default)]
    spec_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    serial_number: Option<String>,
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<JsonMetadata>,
    #[serde(default)]
    components: Vec<JsonComponent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<JsonDependency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    external_references: Vec<JsonExternalReference>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tools: Option<JsonTools>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<JsonProperty>,
}

/// `tools` is an array before CycloneDX 1.5 and an object from 1.5 on
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum JsonTools {
    Legacy(Vec<JsonLegacyTool>),
    Structured {
        #[serde(default)]
        components: Vec<JsonToolComponent>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonLegacyTool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vendor: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonToolComponent {
    #[serde(rename = "type", default = "application_type")]
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

fn application_type() -> String {
    ComponentType::Application.as_str().to_string()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonComponent {
    #[serde(rename = "type", default)]
    component_type: String,
    #[serde(rename = "bom-ref", default, skip_serializing_if = "Option::is_none")]
    bom_ref: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    hashes: Vec<JsonHash>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    licenses: Vec<JsonLicenseChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cpe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    purl: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    external_references: Vec<JsonExternalReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<JsonProperty>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonHash {
    alg: String,
    content: String,
}

/// Either `{"license": {...}}` or `{"expression": "..."}`
#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonLicenseChoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    license: Option<JsonLicense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expression: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonLicense {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonProperty {
    name: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonExternalReference {
    #[serde(rename = "type")]
    reference_type: String,
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonDependency {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    depends_on: Vec<String>,
}

impl From<JsonBom> for Bom {
    fn from(json: JsonBom) -> Self {
        let metadata = json.metadata.unwrap_or_default();
        let tools = match metadata.tools {
            Some(JsonTools::Legacy(tools)) => tools
                .into_iter()
                .map(|t| Tool {
                    vendor: t.vendor,
                    name: t.name,
                    version: t.version,
                })
                .collect(),
            Some(JsonTools::Structured { components }) => components
                .into_iter()
                .map(|t| Tool {
                    vendor: t.publisher.or(t.group),
                    name: t.name,
                    version: t.version,
                })
                .collect(),
            None => Vec::new(),
        };

        Bom {
            spec_version: json.spec_version,
            serial_number: json.serial_number,
            version: json.version,
            metadata: BomMetadata {
                timestamp: metadata.timestamp,
                tools,
                properties: metadata.properties.into_iter().map(Into::into).collect(),
            },
            components: json.components.into_iter().map(Into::into).collect(),
            dependencies: json
                .dependencies
                .into_iter()
                .map(|d| Dependency {
                    reference: d.reference,
                    depends_on: d.depends_on,
                })
                .collect(),
            external_references: json
                .external_references
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

impl From<JsonComponent> for Component {
    fn from(json: JsonComponent) -> Self {
        Component {
            component_type: ComponentType::parse(&json.component_type),
            bom_ref: json.bom_ref,
            name: json.name,
            version: json.version,
            description: json.description,
            scope: json.scope.and_then(|s| s.parse().ok()),
            purl: json.purl,
            cpe: json.cpe,
            hashes: json
                .hashes
                .into_iter()
                .map(|h| Hash {
                    alg: h.alg,
                    content: h.content,
                })
                .collect(),
            licenses: json
                .licenses
                .into_iter()
                .filter_map(JsonLicenseChoice::into_domain)
                .collect(),
            properties: json.properties.into_iter().map(Into::into).collect(),
            external_references: json
                .external_references
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

impl JsonLicenseChoice {
    fn into_domain(self) -> Option<LicenseChoice> {
        match (self.license, self.expression) {
            (Some(l), _) => Some(LicenseChoice::License(License {
                id: l.id,
                name: l.name,
                url: l.url,
            })),
            (None, Some(expression)) => Some(LicenseChoice::Expression(expression)),
            (None, None) => None,
        }
    }
}

impl From<JsonProperty> for Property {
    fn from(json: JsonProperty) -> Self {
        Property::new(json.name, json.value)
    }
}

impl From<JsonExternalReference> for ExternalReference {
    fn from(json: JsonExternalReference) -> Self {
        ExternalReference {
            reference_type: json.reference_type,
            url: json.url,
            comment: json.comment,
        }
    }
}

impl From<&Bom> for JsonBom {
    fn from(bom: &Bom) -> Self {
        let metadata = &bom.metadata;
        let has_metadata = metadata.timestamp.is_some()
            || !metadata.tools.is_empty()
            || !metadata.properties.is_empty();

        JsonBom {
            bom_format: default_bom_format(),
            spec_version: SPEC_VERSION.to_string(),
            serial_number: bom.serial_number.clone(),
            version: bom.version,
            metadata: has_metadata.then(|| JsonMetadata {
                timestamp: metadata.timestamp.clone(),
                tools: (!metadata.tools.is_empty()).then(|| JsonTools::Structured {
                    components: metadata
                        .tools
                        .iter()
                        .map(|t| JsonToolComponent {
                            component_type: application_type(),
                            publisher: t.vendor.clone(),
                            group: None,
                            name: t.name.clone(),
                            version: t.version.clone(),
                        })
                        .collect(),
                }),
                properties: metadata.properties.iter().map(Into::into).collect(),
            }),
            components: bom.components.iter().map(Into::into).collect(),
            dependencies: bom
                .dependencies
                .iter()
                .map(|d| JsonDependency {
                    reference: d.reference.clone(),
                    depends_on: d.depends_on.clone(),
                })
                .collect(),
            external_references: bom.external_references.iter().map(Into::into).collect(),
        }
    }
}

impl From<&Component> for JsonComponent {
    fn from(component: &Component) -> Self {
        JsonComponent {
            component_type: component.component_type.as_str().to_string(),
            bom_ref: component.bom_ref.clone(),
            name: component.name.clone(),
            version: component.version.clone(),
            description: component.description.clone(),
            scope: component.scope.map(|s| s.as_str().to_string()),
            hashes: component
                .hashes
                .iter()
                .map(|h| JsonHash {
                    alg: h.alg.clone(),
                    content: h.content.clone(),
                })
                .collect(),
            licenses: component.licenses.iter().map(Into::into).collect(),
            cpe: component.cpe.clone(),
            purl: component.purl.clone(),
            external_references: component
                .external_references
                .iter()
                .map(Into::into)
                .collect(),
            properties: component.properties.iter().map(Into::into).collect(),
        }
    }
}

impl From<&LicenseChoice> for JsonLicenseChoice {
    fn from(choice: &LicenseChoice) -> Self {
        match choice {
            LicenseChoice::License(l) => JsonLicenseChoice {
                license: Some(JsonLicense {
                    id: l.id.clone(),
                    name: l.name.clone(),
                    url: l.url.clone(),
                }),
                expression: None,
            },
            LicenseChoice::Expression(e) => JsonLicenseChoice {
                license: None,
                expression: Some(e.clone()),
            },
        }
    }
}

impl From<&Property> for JsonProperty {
    fn from(property: &Property) -> Self {
        JsonProperty {
            name: property.name.clone(),
            value: property.value.clone(),
        }
    }
}

impl From<&ExternalReference> for JsonExternalReference {
    fn from(reference: &ExternalReference) -> Self {
        JsonExternalReference {
            reference_type: reference.reference_type.clone(),
            url: reference.url.clone(),
            comment: reference.comment.clone(),
        }
    }
}

/// CycloneDxJsonCodec adapter for CycloneDX JSON documents
///
/// Decodes any CycloneDX JSON version this crate models; encodes 1.5.
#[derive(Debug, Default, Clone, Copy)]
pub struct CycloneDxJsonCodec;

impl CycloneDxJsonCodec {
    pub fn new() -> Self {
        Self
    }
}

impl BomCodec for CycloneDxJsonCodec {
    fn format(&self) -> BomFormat {
        BomFormat::Json
    }

    fn decode(&self, bytes: &[u8]) -> Result<Bom> {
        let json: JsonBom =
            serde_json::from_slice(bytes).context("Failed to parse CycloneDX JSON")?;
        if json.bom_format != BOM_FORMAT {
            anyhow::bail!(
                "Unexpected bomFormat '{}': expected '{}'",
                json.bom_format,
                BOM_FORMAT
            );
        }
        Ok(json.into())
    }

    fn encode(&self, bom: &Bom) -> Result<String> {
        let json = JsonBom::from(bom);
        serde_json::to_string_pretty(&json).context("Failed to serialize CycloneDX JSON")
    }
}
