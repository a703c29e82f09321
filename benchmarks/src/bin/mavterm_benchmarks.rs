use std::alloc::System;
use std::thread;
use std::time::Duration;

#[cfg(feature = "async")]
use mavterm_benchmarks::asnc::benchmark_describe_stream;
#[cfg(feature = "decode")]
use mavterm_benchmarks::decode::{benchmark_decoder, benchmark_dispatcher};

#[global_allocator]
static GLOBAL: mavterm_benchmarks::trallocator::Trallocator<System> =
    mavterm_benchmarks::trallocator::Trallocator::new(System);

#[allow(dead_code)]
fn debug_memory(name: &str, before: u64) {
    let immediate = GLOBAL.get().saturating_sub(before);

    thread::sleep(Duration::from_millis(100));
    let soon = GLOBAL.get().saturating_sub(before);

    log::info!("[{name}] memory used: {immediate} bytes, after 100ms: {soon} bytes",);
}

fn main() {
    GLOBAL.reset();

    // Setup logger
    env_logger::builder()
        .filter_level(log::LevelFilter::Info) // Suppress everything below `info` for third-party modules.
        .filter_module(env!("CARGO_PKG_NAME"), log::LevelFilter::Trace) // Allow everything from current package
        .init();

    #[cfg(feature = "decode")]
    {
        {
            log::info!("[benchmark_decoder]");
            let base_mem = GLOBAL.get();
            benchmark_decoder(100_000);
            debug_memory("benchmark_decoder", base_mem);
        }

        for chunk_size in [1, 64, 1024] {
            log::info!("[benchmark_dispatcher]");
            let base_mem = GLOBAL.get();
            benchmark_dispatcher(100_000, chunk_size);
            debug_memory("benchmark_dispatcher", base_mem);
        }
    }

    #[cfg(feature = "async")]
    {
        log::info!("[benchmark_describe_stream]");
        let base_mem = GLOBAL.get();
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(benchmark_describe_stream(100_000));
        debug_memory("benchmark_describe_stream", base_mem);
    }
}
