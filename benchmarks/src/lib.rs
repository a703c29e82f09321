#[doc(hidden)]
pub mod trallocator;

pub mod capture;

#[cfg(feature = "decode")]
pub mod decode;

#[cfg(feature = "async")]
pub mod asnc;
