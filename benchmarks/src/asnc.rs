use std::time::SystemTime;

use tokio_stream::StreamExt;

use mavterm::io::asnc::describe_stream;
use mavterm::prelude::*;

use crate::capture::make_capture;

pub async fn benchmark_describe_stream(n_frames: usize) {
    let capture = make_capture(n_frames);

    let start = SystemTime::now();
    let mut descriptions = describe_stream(capture.as_slice(), MessageRegistry::standard());
    let mut n_descriptions = 0;
    while let Some(description) = descriptions.next().await {
        if description.is_err() {
            break;
        }
        n_descriptions += 1;
    }
    let end = SystemTime::now();
    let duration = end.duration_since(start).unwrap();

    log::info!(
        "[benchmark_describe_stream] {n_descriptions} descriptions: {}s ({}us per description)",
        duration.as_secs_f32(),
        (duration.as_secs_f64() / n_descriptions as f64 * 1_000_000.0) as f32
    );
}
