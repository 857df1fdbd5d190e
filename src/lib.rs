pub mod action;
pub mod backend;
pub mod cli;
pub mod host;
pub mod overlay;
pub mod resolve;
pub mod surface;
pub mod trace;
