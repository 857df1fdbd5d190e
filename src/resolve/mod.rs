pub mod engine;
pub mod scoring;
