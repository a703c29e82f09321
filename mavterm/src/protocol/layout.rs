//! Message payload layouts.
//!
//! A [`MessageSpec`] describes where each field of a `MAVLink 1` payload lives and how a decoded
//! message should be rendered. MAVLink serializes fields in little-endian byte order, sorted by
//! type size, so every field sits at a fixed offset.

use std::fmt::{Debug, Display, Formatter};

use crate::errors::FrameError;
use crate::protocol::{CrcExtra, MessageId};

/// Formatting rule turning a decoded message into a description.
pub type FormatFn = fn(&DecodedMessage) -> Result<String, FrameError>;

/// Primitive field type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldType {
    /// `uint8_t`
    U8,
    /// `int8_t`
    I8,
    /// `uint16_t`
    U16,
    /// `int16_t`
    I16,
    /// `uint32_t`
    U32,
    /// `int32_t`
    I32,
    /// `uint64_t`
    U64,
    /// `int64_t`
    I64,
    /// `float`
    F32,
    /// `double`
    F64,
}

/// Value of a decoded field.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldValue {
    /// `uint8_t`
    U8(u8),
    /// `int8_t`
    I8(i8),
    /// `uint16_t`
    U16(u16),
    /// `int16_t`
    I16(i16),
    /// `uint32_t`
    U32(u32),
    /// `int32_t`
    I32(i32),
    /// `uint64_t`
    U64(u64),
    /// `int64_t`
    I64(i64),
    /// `float`
    F32(f32),
    /// `double`
    F64(f64),
}

/// A single payload field: name, type and byte offset.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Field {
    /// Field name as defined by MAVLink message definitions.
    pub name: &'static str,
    /// Primitive type.
    pub field_type: FieldType,
    /// Offset from the start of the payload.
    pub offset: usize,
}

/// Static description of a message type.
///
/// Specs are plain constants, see [`messages`](crate::protocol::messages) for the standard set.
/// Fields that are not needed for a description may be omitted from [`MessageSpec::fields`], the
/// declared [`MessageSpec::payload_len`] still has to match the wire format.
#[derive(Copy, Clone)]
pub struct MessageSpec {
    id: MessageId,
    name: &'static str,
    crc_extra: CrcExtra,
    payload_len: usize,
    fields: &'static [Field],
    format: FormatFn,
}

/// Typed values extracted from a frame payload.
///
/// Lives only as long as it takes to build a description.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedMessage {
    id: MessageId,
    name: &'static str,
    values: Vec<(&'static str, FieldValue)>,
}

impl FieldType {
    /// Size of the type on the wire.
    pub const fn size(self) -> usize {
        match self {
            FieldType::U8 | FieldType::I8 => 1,
            FieldType::U16 | FieldType::I16 => 2,
            FieldType::U32 | FieldType::I32 | FieldType::F32 => 4,
            FieldType::U64 | FieldType::I64 | FieldType::F64 => 8,
        }
    }

    /// Reads a little-endian value at `offset`.
    ///
    /// Returns [`None`] if the value does not fit into `bytes`.
    pub fn read(self, bytes: &[u8], offset: usize) -> Option<FieldValue> {
        let end = offset.checked_add(self.size())?;
        let raw = bytes.get(offset..end)?;

        Some(match self {
            FieldType::U8 => FieldValue::U8(raw[0]),
            FieldType::I8 => FieldValue::I8(raw[0] as i8),
            FieldType::U16 => FieldValue::U16(u16::from_le_bytes(raw.try_into().ok()?)),
            FieldType::I16 => FieldValue::I16(i16::from_le_bytes(raw.try_into().ok()?)),
            FieldType::U32 => FieldValue::U32(u32::from_le_bytes(raw.try_into().ok()?)),
            FieldType::I32 => FieldValue::I32(i32::from_le_bytes(raw.try_into().ok()?)),
            FieldType::U64 => FieldValue::U64(u64::from_le_bytes(raw.try_into().ok()?)),
            FieldType::I64 => FieldValue::I64(i64::from_le_bytes(raw.try_into().ok()?)),
            FieldType::F32 => FieldValue::F32(f32::from_le_bytes(raw.try_into().ok()?)),
            FieldType::F64 => FieldValue::F64(f64::from_le_bytes(raw.try_into().ok()?)),
        })
    }
}

impl FieldValue {
    /// Converts value to `f64`. Large 64-bit integers lose precision.
    pub fn as_f64(&self) -> f64 {
        match *self {
            FieldValue::U8(v) => v as f64,
            FieldValue::I8(v) => v as f64,
            FieldValue::U16(v) => v as f64,
            FieldValue::I16(v) => v as f64,
            FieldValue::U32(v) => v as f64,
            FieldValue::I32(v) => v as f64,
            FieldValue::U64(v) => v as f64,
            FieldValue::I64(v) => v as f64,
            FieldValue::F32(v) => v as f64,
            FieldValue::F64(v) => v,
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::U8(v) => Display::fmt(v, f),
            FieldValue::I8(v) => Display::fmt(v, f),
            FieldValue::U16(v) => Display::fmt(v, f),
            FieldValue::I16(v) => Display::fmt(v, f),
            FieldValue::U32(v) => Display::fmt(v, f),
            FieldValue::I32(v) => Display::fmt(v, f),
            FieldValue::U64(v) => Display::fmt(v, f),
            FieldValue::I64(v) => Display::fmt(v, f),
            FieldValue::F32(v) => Display::fmt(v, f),
            FieldValue::F64(v) => Display::fmt(v, f),
        }
    }
}

impl Field {
    /// Defines a field.
    pub const fn new(name: &'static str, field_type: FieldType, offset: usize) -> Self {
        Self {
            name,
            field_type,
            offset,
        }
    }

    /// Offset of the first byte after the field.
    pub const fn end(&self) -> usize {
        self.offset + self.field_type.size()
    }
}

impl MessageSpec {
    /// Defines a message.
    pub const fn new(
        id: MessageId,
        name: &'static str,
        crc_extra: CrcExtra,
        payload_len: usize,
        fields: &'static [Field],
        format: FormatFn,
    ) -> Self {
        Self {
            id,
            name,
            crc_extra,
            payload_len,
            fields,
            format,
        }
    }

    /// Message `ID`.
    #[inline]
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Message name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Checksum seed specific to this message.
    #[inline]
    pub fn crc_extra(&self) -> CrcExtra {
        self.crc_extra
    }

    /// Declared payload length.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload_len
    }

    /// Decoded fields in wire order.
    #[inline]
    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }

    /// Extracts typed field values from `payload`.
    ///
    /// Fails if the payload length differs from [`MessageSpec::payload_len`].
    pub fn decode(&self, payload: &[u8]) -> Result<DecodedMessage, FrameError> {
        let length_error = || FrameError::PayloadLength {
            id: self.id,
            expected: self.payload_len,
            actual: payload.len(),
        };

        if payload.len() != self.payload_len {
            return Err(length_error());
        }

        let values = self
            .fields
            .iter()
            .map(|field| {
                field
                    .field_type
                    .read(payload, field.offset)
                    .map(|value| (field.name, value))
                    .ok_or_else(length_error)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DecodedMessage {
            id: self.id,
            name: self.name,
            values,
        })
    }

    /// Renders a decoded message with the message's formatting rule.
    #[inline]
    pub fn format(&self, message: &DecodedMessage) -> Result<String, FrameError> {
        (self.format)(message)
    }
}

impl Debug for MessageSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageSpec")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("crc_extra", &self.crc_extra)
            .field("payload_len", &self.payload_len)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl DecodedMessage {
    /// Message `ID`.
    #[inline]
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Message name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the value of a field by name.
    pub fn get(&self, field: &'static str) -> Result<FieldValue, FrameError> {
        self.values
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| *value)
            .ok_or(FrameError::UnknownField { id: self.id, field })
    }

    /// Iterates over decoded `(name, value)` pairs in wire order.
    pub fn values(&self) -> impl Iterator<Item = (&'static str, FieldValue)> + '_ {
        self.values.iter().copied()
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;

    const FIELDS: &[Field] = &[
        Field::new("a", FieldType::U16, 0),
        Field::new("b", FieldType::F32, 2),
        Field::new("c", FieldType::I8, 6),
    ];

    fn format_abc(message: &DecodedMessage) -> Result<String, FrameError> {
        Ok(format!(
            "a={} b={} c={}",
            message.get("a")?,
            message.get("b")?,
            message.get("c")?
        ))
    }

    const ABC: MessageSpec = MessageSpec::new(200, "ABC", 7, 7, FIELDS, format_abc);

    fn payload() -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&513u16.to_le_bytes());
        payload.extend_from_slice(&1.5f32.to_le_bytes());
        payload.push((-3i8) as u8);
        payload
    }

    #[test]
    fn field_reads_are_bounded() {
        assert!(FieldType::U32.read(&[1, 2, 3], 0).is_none());
        assert!(FieldType::U8.read(&[1, 2, 3], 3).is_none());
        assert!(FieldType::U64.read(&[0; 8], usize::MAX).is_none());
        assert_eq!(
            FieldType::I16.read(&[0xFF, 0xFF], 0),
            Some(FieldValue::I16(-1))
        );
    }

    #[test]
    fn spec_decodes_and_formats() {
        let message = ABC.decode(&payload()).unwrap();

        assert_eq!(message.id(), 200);
        assert_eq!(message.get("a").unwrap(), FieldValue::U16(513));
        assert_eq!(ABC.format(&message).unwrap(), "a=513 b=1.5 c=-3");
        assert_eq!(message.values().count(), 3);
    }

    #[test]
    fn wrong_payload_length_is_rejected() {
        let mut payload = payload();
        payload.pop();

        assert_eq!(
            ABC.decode(&payload),
            Err(FrameError::PayloadLength {
                id: 200,
                expected: 7,
                actual: 6
            })
        );
    }

    #[test]
    fn missing_field_is_reported() {
        let message = ABC.decode(&payload()).unwrap();
        assert_eq!(
            message.get("z"),
            Err(FrameError::UnknownField { id: 200, field: "z" })
        );
    }

    #[test]
    fn values_convert_to_f64() {
        assert_eq!(FieldValue::I32(-7).as_f64(), -7.0);
        assert_eq!(FieldValue::F32(0.5).as_f64(), 0.5);
    }
}
