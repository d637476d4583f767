use crate::adapters::outbound::codecs::{CycloneDxJsonCodec, CycloneDxXmlCodec};
use crate::application::dto::BomFormat;
use crate::inventory::domain::Bom;
use crate::ports::outbound::BomCodec;
use crate::shared::error::SbomError;
use crate::shared::Result;

const UTF8_BYTE_ORDER_MARK: &[u8] = b"\xEF\xBB\xBF";

/// Factory for CycloneDX codecs
pub struct CodecFactory;

impl CodecFactory {
    /// Creates the codec for an explicitly requested encoding
    ///
    /// # Examples
    /// ```
    /// use bom_harvest::application::dto::BomFormat;
    /// use bom_harvest::application::factories::CodecFactory;
    ///
    /// let codec = CodecFactory::create(BomFormat::Xml);
    /// assert_eq!(codec.format(), BomFormat::Xml);
    /// ```
    pub fn create(format: BomFormat) -> Box<dyn BomCodec> {
        match format {
            BomFormat::Json => Box::new(CycloneDxJsonCodec::new()),
            BomFormat::Xml => Box::new(CycloneDxXmlCodec::new()),
        }
    }

    /// Picks a codec by sniffing the first non-whitespace byte after any UTF-8 BOM
    ///
    /// # Errors
    /// Returns `SbomError::BadFormat` when the bytes are neither JSON nor XML.
    pub fn detect(bytes: &[u8]) -> std::result::Result<Box<dyn BomCodec>, SbomError> {
        let bytes = strip_byte_order_mark(bytes);
        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => Ok(Self::create(BomFormat::Json)),
            Some(b'<') => Ok(Self::create(BomFormat::Xml)),
            _ => Err(SbomError::BadFormat {
                requested: String::from_utf8_lossy(&bytes[..bytes.len().min(16)])
                    .trim()
                    .to_string(),
            }),
        }
    }

    /// Decodes raw tool output in whichever encoding it uses
    pub fn decode(bytes: &[u8]) -> Result<Bom> {
        let bytes = strip_byte_order_mark(bytes);
        Self::detect(bytes)?.decode(bytes)
    }

    /// Returns the progress message for encoding the merged BOM
    pub fn progress_message(format: BomFormat) -> &'static str {
        match format {
            BomFormat::Json => "📝 Encoding CycloneDX JSON output...",
            BomFormat::Xml => "📝 Encoding CycloneDX XML output...",
        }
    }
}

fn strip_byte_order_mark(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BYTE_ORDER_MARK).unwrap_or(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_matches_format() {
        assert_eq!(CodecFactory::create(BomFormat::Json).format(), BomFormat::Json);
        assert_eq!(CodecFactory::create(BomFormat::Xml).format(), BomFormat::Xml);
    }

    #[test]
    fn test_detect_by_leading_byte() {
        assert_eq!(
            CodecFactory::detect(b"  \n{\"bomFormat\":\"CycloneDX\"}").unwrap().format(),
            BomFormat::Json
        );
        assert_eq!(
            CodecFactory::detect(b"<?xml version=\"1.0\"?><bom/>").unwrap().format(),
            BomFormat::Xml
        );
    }

    #[test]
    fn test_detect_rejects_unknown_encoding() {
        let err = CodecFactory::detect(b"SPDXVersion: SPDX-2.3").err().unwrap();
        assert!(matches!(err, SbomError::BadFormat { .. }));
        assert!(CodecFactory::detect(b"").is_err());
    }

    #[test]
    fn test_decode_json_tool_output() {
        let bom = CodecFactory::decode(
            br#"{"bomFormat":"CycloneDX","specVersion":"1.5","components":[{"type":"library","name":"a","purl":"pkg:npm/a@1.0.0"}]}"#,
        )
        .unwrap();
        assert_eq!(bom.component_count(), 1);
    }

    #[test]
    fn test_decode_skips_utf8_byte_order_mark() {
        let mut json = b"\xEF\xBB\xBF".to_vec();
        json.extend_from_slice(
            br#"{"bomFormat":"CycloneDX","specVersion":"1.5","components":[{"type":"library","name":"a","purl":"pkg:npm/a@1.0.0"}]}"#,
        );
        assert_eq!(CodecFactory::detect(&json).unwrap().format(), BomFormat::Json);
        assert_eq!(CodecFactory::decode(&json).unwrap().component_count(), 1);

        let mut xml = b"\xEF\xBB\xBF".to_vec();
        xml.extend_from_slice(
            br#"<?xml version="1.0"?><bom xmlns="http://cyclonedx.org/schema/bom/1.5" version="1"><components><component type="library"><name>b</name><version>2.0.0</version><purl>pkg:npm/b@2.0.0</purl></component></components></bom>"#,
        );
        assert_eq!(CodecFactory::decode(&xml).unwrap().component_count(), 1);
    }
}
