use crate::application::dto::BomFormat;
use crate::inventory::domain::Bom;
use crate::shared::Result;

/// BomCodec port for converting between encoded CycloneDX and [`Bom`]
///
/// Implementations exist for each supported encoding (JSON, XML).
pub trait BomCodec: Send + Sync {
    fn format(&self) -> BomFormat;

    /// Decodes raw bytes into a BOM
    ///
    /// # Errors
    /// Returns an error if the bytes are not a valid document of this
    /// codec's encoding.
    fn decode(&self, bytes: &[u8]) -> Result<Bom>;

    /// Encodes a BOM as a CycloneDX 1.5 document
    fn encode(&self, bom: &Bom) -> Result<String>;
}
