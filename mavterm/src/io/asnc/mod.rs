//! Asynchronous adapters based on [Tokio](https://tokio.rs).

mod codec;
mod stream;

pub use codec::MavlinkCodec;
pub use stream::{describe_into, describe_stream};
