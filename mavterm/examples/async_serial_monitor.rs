use std::env;

use tokio_stream::StreamExt;

use mavterm::io::asnc::describe_stream;
use mavterm::io::SerialConf;
use mavterm::prelude::*;

#[cfg(target_os = "windows")]
const DEFAULT_PATH: &str = "COM3";
#[cfg(target_os = "macos")]
const DEFAULT_PATH: &str = "/dev/tty.usbmodem01";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const DEFAULT_PATH: &str = "/dev/ttyACM0";

async fn run(path: &str) -> Result<()> {
    log::warn!("[serial] connecting to {path}");

    let port = SerialConf::new(path).open_async().await?;
    let mut descriptions = describe_stream(port, MessageRegistry::standard());

    while let Some(description) = descriptions.next().await {
        print!("{}", description?);
    }

    log::warn!("[serial] finished");
    Ok(())
}

#[tokio::main]
async fn main() {
    // Setup logger
    env_logger::builder()
        .filter_level(log::LevelFilter::Info) // Suppress everything below `info` for third-party modules.
        .filter_module(env!("CARGO_PKG_NAME"), log::LevelFilter::Info) // Log level for current package
        .init();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_PATH.to_string());
    run(&path).await.unwrap();
}
