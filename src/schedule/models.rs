use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

pub mod lesson_model;
pub mod room_model;
pub mod teacher_load_model;

pub const DEFAULT_UPSTREAM_URL: &str = "https://dekanat.nung.edu.ua/cgi-bin/timetable_export.cgi";

/// A model for describing ARGS of the tool.
/// Only the path to config.json is taken from the command line, everything else lives in the config.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, value_name = "FILE", default_value = "config.json")]
    pub config_json_path: PathBuf,
}

/// A model for describing configuration of the proxy.
/// Consists of:
/// 1. Address the HTTP server binds to
/// 2. Base URL of timetable_export.cgi
/// 3. Timeout for a single upstream request, in seconds
/// 4. Optional directory with the front end, served for every unmatched path
///
/// Every field has a default, so an absent config.json is fine.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub upstream_url: String,
    pub request_timeout_secs: u64,
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_owned(),
            upstream_url: DEFAULT_UPSTREAM_URL.to_owned(),
            request_timeout_secs: 30,
            static_dir: None,
        }
    }
}
