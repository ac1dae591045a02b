pub mod config;
pub mod error;
pub mod generate;
pub mod graph;
pub mod output;
pub mod random;
pub mod seed;

// Re-export key types for convenience
pub use config::GeneratorConfig;
pub use error::{Result, SeedError};
pub use generate::engine::{generate, GeneratedScript};
pub use generate::Stage;
pub use random::SeededStream;
