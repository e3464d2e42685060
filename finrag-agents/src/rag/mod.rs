mod engine;

pub use engine::{RagEngine, RagEngineConfig};
