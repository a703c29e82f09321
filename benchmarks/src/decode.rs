use std::time::SystemTime;

use mavterm::io::{MessageDispatcher, ScrollbackSink};
use mavterm::prelude::*;

use crate::capture::make_capture;

pub fn benchmark_dispatcher(n_frames: usize, chunk_size: usize) {
    let capture = make_capture(n_frames);
    let mut dispatcher = MessageDispatcher::new();
    let mut sink = ScrollbackSink::with_capacity(1_000);

    let start = SystemTime::now();
    for chunk in capture.chunks(chunk_size) {
        for description in dispatcher.process(chunk) {
            sink.append(&description).unwrap();
        }
    }
    let end = SystemTime::now();
    let duration = end.duration_since(start).unwrap();

    let stats = dispatcher.decoder().stats();
    log::info!(
        "[benchmark_dispatcher] {} bytes in {chunk_size}-byte chunks, {} frames, {} dropped: {}s ({} MB/s)",
        capture.len(),
        stats.frames,
        stats.checksum_mismatches,
        duration.as_secs_f32(),
        (capture.len() as f64 / duration.as_secs_f64() / 1_000_000.0) as f32
    );
}

pub fn benchmark_decoder(n_frames: usize) {
    let capture = make_capture(n_frames);
    let mut decoder = FrameDecoder::new();

    let start = SystemTime::now();
    let n_decoded = decoder.frames(capture.iter().copied()).count();
    let end = SystemTime::now();
    let duration = end.duration_since(start).unwrap();

    log::info!(
        "[benchmark_decoder] {n_decoded} frames: {}s ({}us per frame)",
        duration.as_secs_f32(),
        (duration.as_secs_f64() / n_decoded as f64 * 1_000_000.0) as f32
    );
}
