/// Ports module defining interfaces for hexagonal architecture
///
/// The collection pipeline is driven directly by the application use cases;
/// only outbound (driven) ports exist.
pub mod outbound;
