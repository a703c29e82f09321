use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, OnceLock};

use crate::errors::FrameError;
use crate::protocol::{messages, CrcExtra, DecodedMessage, Frame, MessageId, MessageSpec};

/// A message type that can be decoded and described.
///
/// Implemented by [`MessageSpec`]. Custom implementations can be added to a
/// [`MessageRegistry`] with [`MessageRegistryBuilder::add`].
pub trait DescribeMessage: Debug + Send + Sync {
    /// Message `ID`.
    fn id(&self) -> MessageId;

    /// Message name.
    fn name(&self) -> &'static str;

    /// Checksum seed specific to this message.
    fn crc_extra(&self) -> CrcExtra;

    /// Extracts typed values from a frame payload.
    fn decode(&self, payload: &[u8]) -> Result<DecodedMessage, FrameError>;

    /// Renders a decoded message.
    fn format(&self, message: &DecodedMessage) -> Result<String, FrameError>;

    /// Decodes and renders a payload.
    fn describe(&self, payload: &[u8]) -> Result<String, FrameError> {
        let message = self.decode(payload)?;
        self.format(&message)
    }
}

impl DescribeMessage for MessageSpec {
    fn id(&self) -> MessageId {
        MessageSpec::id(self)
    }

    fn name(&self) -> &'static str {
        MessageSpec::name(self)
    }

    fn crc_extra(&self) -> CrcExtra {
        MessageSpec::crc_extra(self)
    }

    fn decode(&self, payload: &[u8]) -> Result<DecodedMessage, FrameError> {
        MessageSpec::decode(self, payload)
    }

    fn format(&self, message: &DecodedMessage) -> Result<String, FrameError> {
        MessageSpec::format(self, message)
    }
}

/// Immutable mapping from message `ID` to a message description rule.
///
/// The registry provides [`CrcExtra`] values to frame decoders and renders frame payloads as
/// human-readable descriptions. Unknown messages and payloads that can't be decoded are described
/// generically, so [`MessageRegistry::describe`] never fails.
///
/// # Usage
///
/// ```rust
/// use mavterm::protocol::messages::HEARTBEAT_ID;
/// use mavterm::protocol::MessageRegistry;
///
/// let registry = MessageRegistry::standard();
///
/// let payload = [0, 0, 0, 0, 2, 12, 81, 4, 3];
/// assert_eq!(
///     registry.describe(HEARTBEAT_ID, &payload),
///     "HEARTBEAT mavlink_version: 3"
/// );
/// assert_eq!(registry.describe(250, &[]), "OTHER Message id 250 received");
/// ```
#[derive(Clone, Debug, Default)]
pub struct MessageRegistry {
    descriptors: HashMap<MessageId, Arc<dyn DescribeMessage>>,
}

/// Builder for [`MessageRegistry`].
#[derive(Clone, Debug, Default)]
pub struct MessageRegistryBuilder {
    inner: MessageRegistry,
}

impl MessageRegistry {
    /// Creates an empty builder.
    pub fn builder() -> MessageRegistryBuilder {
        MessageRegistryBuilder::default()
    }

    /// Shared registry with all [`messages::STANDARD`] messages.
    ///
    /// The registry is built once per process.
    pub fn standard() -> Arc<MessageRegistry> {
        static STANDARD: OnceLock<Arc<MessageRegistry>> = OnceLock::new();

        STANDARD
            .get_or_init(|| Arc::new(Self::builder().with_standard().build()))
            .clone()
    }

    /// Returns a descriptor for message `id`.
    pub fn get(&self, id: MessageId) -> Option<&dyn DescribeMessage> {
        self.descriptors.get(&id).map(|descriptor| descriptor.as_ref())
    }

    /// Returns `true` if message `id` is known.
    #[inline]
    pub fn contains(&self, id: MessageId) -> bool {
        self.descriptors.contains_key(&id)
    }

    /// Returns [`CrcExtra`] for message `id` if the message is known.
    pub fn crc_extra(&self, id: MessageId) -> Option<CrcExtra> {
        self.get(id).map(|descriptor| descriptor.crc_extra())
    }

    /// Number of known messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if the registry has no messages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Known message `ID`s in ascending order.
    pub fn ids(&self) -> Vec<MessageId> {
        let mut ids: Vec<_> = self.descriptors.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Decodes a payload of a known message.
    ///
    /// Returns [`None`] for unknown messages.
    pub fn decode(
        &self,
        id: MessageId,
        payload: &[u8],
    ) -> Option<Result<DecodedMessage, FrameError>> {
        self.get(id).map(|descriptor| descriptor.decode(payload))
    }

    /// Describes a message payload.
    ///
    /// Unknown messages and payloads that fail to decode get a
    /// [generic description](MessageRegistry::generic_description).
    pub fn describe(&self, id: MessageId, payload: &[u8]) -> String {
        let Some(descriptor) = self.get(id) else {
            return Self::generic_description(id);
        };

        match descriptor.describe(payload) {
            Ok(description) => description,
            Err(err) => {
                log::debug!("[registry] can't describe {}: {err}", descriptor.name());
                Self::generic_description(id)
            }
        }
    }

    /// Describes a validated frame.
    #[inline]
    pub fn describe_frame(&self, frame: &Frame) -> String {
        self.describe(frame.message_id(), frame.payload())
    }

    /// Description for messages that can't be decoded.
    pub fn generic_description(id: MessageId) -> String {
        format!("OTHER Message id {id} received")
    }
}

impl MessageRegistryBuilder {
    /// Builds a [`MessageRegistry`].
    pub fn build(self) -> MessageRegistry {
        self.inner
    }

    /// Adds a message descriptor.
    ///
    /// A descriptor with the same `ID` replaces the previous one.
    pub fn add(mut self, descriptor: impl DescribeMessage + 'static) -> Self {
        self.inner
            .descriptors
            .insert(descriptor.id(), Arc::new(descriptor));
        self
    }

    /// Adds message specs.
    pub fn extend(self, specs: impl IntoIterator<Item = MessageSpec>) -> Self {
        specs.into_iter().fold(self, |builder, spec| builder.add(spec))
    }

    /// Adds all [`messages::STANDARD`] messages.
    pub fn with_standard(self) -> Self {
        self.extend(messages::STANDARD.iter().copied())
    }
}
