use crate::inventory::domain::Component;
use crate::ports::outbound::CpeResolver;

/// PurlCpeResolver adapter deriving CPE 2.3 names from package URLs
///
/// `pkg:npm/actions/core@1.10.0` becomes
/// `cpe:2.3:a:actions:core:1.10.0:*:*:*:*:*:*:*`. The vendor is the last
/// namespace segment, or the product name when the purl has no namespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct PurlCpeResolver;

impl PurlCpeResolver {
    pub fn new() -> Self {
        Self
    }
}

impl CpeResolver for PurlCpeResolver {
    fn resolve(&self, component: &Component) -> Option<String> {
        let purl = component.purl()?;
        let (_, path) = purl.split_once(':')?;
        let path = path.split(['?', '#']).next()?;
        let (path, purl_version) = match path.rsplit_once('@') {
            Some((p, v)) if !p.is_empty() => (p, Some(v)),
            _ => (path, None),
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).skip(1).collect();
        let (product, namespace) = segments.split_last()?;
        let vendor = namespace
            .last()
            .map(|ns| ns.trim_start_matches('@'))
            .filter(|ns| !ns.is_empty())
            .unwrap_or(product);

        let version = purl_version
            .filter(|v| !v.is_empty())
            .or(component.version.as_deref())?;

        Some(format!(
            "cpe:2.3:a:{}:{}:{}:*:*:*:*:*:*:*",
            escape(vendor),
            escape(product),
            escape(version)
        ))
    }
}

/// Lowercases and backslash-escapes characters CPE 2.3 formatted strings
/// reserve
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.to_lowercase().chars() {
        match ch {
            ' ' => escaped.push('_'),
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' => escaped.push(c),
            c => {
                escaped.push('\\');
                escaped.push(c);
            }
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(purl: &str, version: &str) -> Option<String> {
        PurlCpeResolver::new().resolve(&Component::library("x", version, purl))
    }

    #[test]
    fn test_namespace_becomes_vendor() {
        assert_eq!(
            resolve("pkg:npm/actions/core@1.10.0", "1.10.0").as_deref(),
            Some("cpe:2.3:a:actions:core:1.10.0:*:*:*:*:*:*:*")
        );
    }

    #[test]
    fn test_product_is_vendor_without_namespace() {
        assert_eq!(
            resolve("pkg:gem/rake@13.0.6?platform=ruby", "13.0.6").as_deref(),
            Some("cpe:2.3:a:rake:rake:13.0.6:*:*:*:*:*:*:*")
        );
    }

    #[test]
    fn test_go_module_uses_last_namespace_segment() {
        assert_eq!(
            resolve("pkg:golang/github.com/spf13/cobra@v1.8.0", "v1.8.0").as_deref(),
            Some("cpe:2.3:a:spf13:cobra:v1.8.0:*:*:*:*:*:*:*")
        );
    }

    #[test]
    fn test_falls_back_to_component_version() {
        assert_eq!(
            resolve("pkg:pypi/Flask", "3.0.0").as_deref(),
            Some("cpe:2.3:a:flask:flask:3.0.0:*:*:*:*:*:*:*")
        );
    }

    #[test]
    fn test_unresolvable_components() {
        assert!(resolve("pkg:pypi/flask", "").is_none());
        assert!(resolve("not-a-purl", "1.0").is_none());
        assert!(PurlCpeResolver::new()
            .resolve(&Component::library("x", "1.0", ""))
            .is_none());
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        assert_eq!(escape("a+b:c"), "a\\+b\\:c");
        assert_eq!(escape("My Lib"), "my_lib");
    }
}
