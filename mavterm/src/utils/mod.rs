//! Common utils.

mod ring;
#[cfg(test)]
#[allow(dead_code)]
pub(crate) mod test;

pub(crate) use ring::RingBuffer;
