/// Domain layer - BOM model and the pure discovery/merge logic
///
/// Nothing in here touches the filesystem or spawns processes directly;
/// tree access goes through the `FileTree` port.
pub mod domain;
pub mod services;
