use std::io::stdout;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use mavterm::io::{
    notify, LogNotifier, Monitor, Notification, PortWatcher, SerialConf, WriterSink,
};
use mavterm::prelude::*;

#[cfg(target_os = "windows")]
const DEVICE_PREFIX: &str = "COM";
#[cfg(target_os = "macos")]
const DEVICE_PREFIX: &str = "/dev/tty.usbmodem";
#[cfg(target_os = "linux")]
const DEVICE_PREFIX: &str = "/dev/ttyACM";
#[cfg(all(not(target_os = "macos"), not(target_os = "linux"), unix))]
const DEVICE_PREFIX: &str = "/dev/tty";
const POLL_INTERVAL: Duration = Duration::from_secs(1);

fn monitor(path: &str) -> Result<()> {
    log::warn!("[serial] connecting to {path}");

    let port = SerialConf::new(path).open()?;
    let mut monitor = Monitor::new(path, port, WriterSink::new(stdout()));
    monitor.run()?;

    let stats = monitor.dispatcher().decoder().stats();
    log::warn!(
        "[serial] {path} done: {} frames, {} checksum mismatches, {} bytes discarded",
        stats.frames,
        stats.checksum_mismatches,
        stats.discarded_bytes
    );
    Ok(())
}

fn run() -> Result<()> {
    let notifier = Arc::new(LogNotifier);
    let mut watcher = PortWatcher::new();

    loop {
        let change = watcher.poll()?;
        for notification in Notification::for_change(&change) {
            notify(&notifier, notification);
        }

        let attached = change
            .attached
            .iter()
            .find(|port| port.starts_with(DEVICE_PREFIX));
        if let Some(path) = attached {
            if let Err(err) = monitor(path) {
                log::error!("[serial] {path} failed: {err}");
            }
        }

        thread::sleep(POLL_INTERVAL);
    }
}

fn main() {
    // Setup logger
    env_logger::builder()
        .filter_level(log::LevelFilter::Info) // Suppress everything below `info` for third-party modules.
        .filter_module(env!("CARGO_PKG_NAME"), log::LevelFilter::Info) // Log level for current package
        .init();

    run().unwrap();
}
