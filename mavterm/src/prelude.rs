//! # Basic imports

pub use crate::errors::{Error, FrameError, Result};

pub use crate::io::{DescriptionSink, MessageDispatcher};
pub use crate::protocol::{
    DecoderConf, DecoderState, Frame, FrameDecoder, FrameResult, MessageId, MessageRegistry,
};
