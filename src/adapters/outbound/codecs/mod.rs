/// CycloneDX codecs for decoding tool output and encoding merged BOMs
mod cyclonedx_json;
mod cyclonedx_xml;

pub use cyclonedx_json::CycloneDxJsonCodec;
pub use cyclonedx_xml::CycloneDxXmlCodec;
