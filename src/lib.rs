#![forbid(unsafe_code)]

pub mod classify;
pub mod cli;
pub mod dedup;
pub mod fetch;
pub mod formats;
pub mod history;
pub mod json_file;
pub mod logging;
pub mod normalize;
pub mod platform;
pub mod sites;
pub mod stats;
pub mod track;
