pub mod loader;
pub mod probe;
pub mod resolver;
pub mod source;

// Re-exports for convenience
pub use probe::{HttpTileProber, TileProber};
pub use resolver::{TileResolver, TileStatus};
pub use source::{TileCandidate, TileSource};
