#![allow(dead_code)]

pub mod fake_host;
pub mod surfaces;
