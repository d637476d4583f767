/// CPE derivation adapters
mod purl_cpe_resolver;

pub use purl_cpe_resolver::PurlCpeResolver;
