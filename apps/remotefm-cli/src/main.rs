//! remotefm command-line entry point.

mod app;
mod args;
mod config;
mod console;

use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage: remotefm [--endpoint URL] [--sort dirs-first|name|none] COMMAND

commands:
  ls [DIR]             list a remote directory (default: start_path)
  put DIR LOCAL...     upload local files or directories into DIR
  rm PATH              delete a remote file or directory
  get PATH [OUT]       download a remote file";

fn main() -> anyhow::Result<()> {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    if raw.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return Ok(());
    }
    let invocation = match args::parse(raw) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    let mut config = config::Config::load()?;
    invocation.apply(&mut config);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        endpoint = %config.endpoint,
        "starting remotefm"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run(config, invocation.command))
}
