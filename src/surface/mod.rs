pub mod normalize;
pub mod scanner;
pub mod surface_model;
