pub mod error;
pub mod executor;
pub mod machine;
pub mod overlay_model;
