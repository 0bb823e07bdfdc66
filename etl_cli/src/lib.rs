#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
