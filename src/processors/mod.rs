// imgforge/src/processors/mod.rs
mod batch;
pub mod effects;
pub mod pipeline;
pub mod watermark;

pub use batch::{BatchProcessor, FileOutcome};

pub mod prelude {
    pub use super::{BatchProcessor, FileOutcome};
}
