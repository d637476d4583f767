use crate::inventory::domain::{BomMetadata, Tool};
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

/// Fresh identity for a newly assembled BOM
#[derive(Debug, Clone)]
pub struct BomHeader {
    pub serial_number: String,
    pub metadata: BomMetadata,
}

/// MetadataGenerator service for stamping merged BOMs
///
/// Every merged BOM gets its own serial number and timestamp; nothing is
/// inherited from the inputs.
pub struct MetadataGenerator;

impl MetadataGenerator {
    /// Generates a header with current timestamp and unique serial number
    pub fn generate(tool_name: &str, tool_version: &str) -> BomHeader {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let serial_number = format!("urn:uuid:{}", Uuid::new_v4());

        BomHeader {
            serial_number,
            metadata: BomMetadata {
                timestamp: Some(timestamp),
                tools: vec![Tool {
                    vendor: None,
                    name: tool_name.to_string(),
                    version: Some(tool_version.to_string()),
                }],
                properties: Vec::new(),
            },
        }
    }

    /// Generates a header naming this crate as the producing tool
    pub fn generate_default() -> BomHeader {
        Self::generate(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}
