use crate::shared::error::SbomError;

/// CycloneDX encoding of a BOM document
///
/// Shared by the CLI, the config file, the codecs and the external tool
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BomFormat {
    /// CycloneDX JSON (default)
    #[default]
    Json,
    /// CycloneDX XML
    Xml,
}

impl BomFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            BomFormat::Json => "json",
            BomFormat::Xml => "xml",
        }
    }
}

impl std::str::FromStr for BomFormat {
    type Err = SbomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(BomFormat::Json),
            "xml" => Ok(BomFormat::Xml),
            _ => Err(SbomError::BadFormat {
                requested: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for BomFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
