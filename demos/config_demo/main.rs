//! # clapflags demo
//!
//! Derives flags from [`DemoConfig`](config::DemoConfig) and prints the
//! resolved configuration.
//!
//! ```sh
//! cargo run --example config_demo -- --help
//! cargo run --example config_demo -- -f hello --bar-enabled
//! FLAGS_DEMO_BAR_EXAMPLESTRING=hi cargo run --example config_demo
//! cargo run --example config_demo -- --config ./flags-demo.toml
//! cargo run --example config_demo -- --foo=             # --foo length must be at least 1
//! RUST_LOG=clapflags=debug cargo run --example config_demo
//! ```
//!
//! Config files are read from `/etc/flags-demo/flags-demo.toml` and then
//! `./flags-demo.toml`; the second wins.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Command;
use tracing_subscriber::EnvFilter;

use clapflags::{Clapflags, SearchPath};

use config::DemoConfig;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cmd = Command::new("flags-demo").about("Print the configuration resolved from flags, files and env");

    Clapflags::builder::<DemoConfig>()
        .app_name("flags-demo")
        .env_prefix("FLAGS_DEMO")
        .search_paths(vec![
            SearchPath::Path(PathBuf::from("/etc/flags-demo")),
            SearchPath::Cwd,
        ])
        .execute(cmd, |config: DemoConfig, _| {
            println!("{config:#?}");
            Ok::<_, String>(())
        })
}
