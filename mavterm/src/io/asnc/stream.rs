use std::sync::Arc;

use tokio::io::AsyncRead;
use tokio_stream::{Stream, StreamExt};
use tokio_util::codec::FramedRead;

use crate::io::asnc::MavlinkCodec;
use crate::io::dispatcher::description_line;
use crate::io::DescriptionSink;
use crate::protocol::MessageRegistry;

use crate::prelude::*;

/// Turns an asynchronous byte source into a stream of message descriptions.
///
/// Each description ends with a line break. The stream ends with the source, I/O errors are
/// yielded as they happen.
///
/// # Usage
///
/// ```rust
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use mavterm::io::asnc::describe_stream;
/// use mavterm::protocol::MessageRegistry;
/// use tokio_stream::StreamExt;
///
/// let bytes: &[u8] = &[
///     0xFE, 0x09, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00,
///     0x00, 0x02, 0x03, 0x51, 0x04, 0x03, 0x7D, 0xDD,
/// ];
///
/// let mut descriptions = describe_stream(bytes, MessageRegistry::standard());
/// assert_eq!(
///     descriptions.next().await.unwrap().unwrap(),
///     "HEARTBEAT mavlink_version: 3\n"
/// );
/// assert!(descriptions.next().await.is_none());
/// # }
/// ```
pub fn describe_stream<R: AsyncRead + Unpin>(
    reader: R,
    registry: Arc<MessageRegistry>,
) -> impl Stream<Item = Result<String>> + Unpin {
    let codec = MavlinkCodec::with_registry(registry.clone());

    FramedRead::new(reader, codec)
        .map(move |frame| frame.map(|frame| description_line(&registry, &frame)))
}

/// Reads `reader` until it ends and appends descriptions to `sink`.
///
/// Returns the number of descriptions.
pub async fn describe_into<R, S>(
    reader: R,
    registry: Arc<MessageRegistry>,
    sink: &mut S,
) -> Result<usize>
where
    R: AsyncRead + Unpin,
    S: DescriptionSink,
{
    let mut descriptions = describe_stream(reader, registry);
    let mut count = 0;

    while let Some(description) = descriptions.next().await {
        sink.append(&description?)?;
        count += 1;
    }

    log::debug!("[async] source ended after {count} descriptions");
    Ok(count)
}
