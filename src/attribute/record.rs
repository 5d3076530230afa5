//! Attribute record format for the file store
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, whole record)
//! +------------------+
//! | Entity Type      | (u32 LE tag)
//! +------------------+
//! | Entity ID        | (i64 LE)
//! +------------------+
//! | Attribute Name   | (length-prefixed string)
//! +------------------+
//! | Value Kind       | (u8: 0 = integer, 1 = text)
//! +------------------+
//! | Value            | integer: u32 count + count * i64 LE
//! |                  | text: length-prefixed string
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself.

use std::io::{self, Cursor, Read};

use crate::field::EntityType;

use super::checksum::compute_checksum;
use super::value::AttributeValue;

const KIND_INTEGER: u8 = 0;
const KIND_TEXT: u8 = 1;

/// len + entity type + entity id + empty name + kind + empty value + checksum
pub const MIN_RECORD_SIZE: usize = 4 + 4 + 8 + 4 + 1 + 4 + 4;

/// One attribute write as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRecord {
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub name: String,
    pub value: AttributeValue,
}

impl AttributeRecord {
    pub fn new(
        entity_type: EntityType,
        entity_id: i64,
        name: impl Into<String>,
        value: AttributeValue,
    ) -> Self {
        Self {
            entity_type,
            entity_id,
            name: name.into(),
            value,
        }
    }

    fn serialize_body(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        buf.extend_from_slice(&self.entity_type.tag().to_le_bytes());
        buf.extend_from_slice(&self.entity_id.to_le_bytes());

        buf.extend_from_slice(&(self.name.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.name.as_bytes());

        match &self.value {
            AttributeValue::Integer(values) => {
                buf.push(KIND_INTEGER);
                buf.extend_from_slice(&(values.len() as u32).to_le_bytes());
                for v in values {
                    buf.extend_from_slice(&v.to_le_bytes());
                }
            }
            AttributeValue::Text(text) => {
                buf.push(KIND_TEXT);
                buf.extend_from_slice(&(text.len() as u32).to_le_bytes());
                buf.extend_from_slice(text.as_bytes());
            }
        }

        buf
    }

    /// Serialize the complete record: length prefix, body, checksum.
    pub fn serialize(&self) -> Vec<u8> {
        let body = self.serialize_body();
        let record_length = (4 + body.len() + 4) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&body);

        let checksum = compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());

        record
    }

    /// Deserialize a record from the front of `data`, verifying its checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Record too short",
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed_checksum = compute_checksum(&data[..checksum_offset]);

        if computed_checksum != stored_checksum {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        let mut cursor = Cursor::new(&data[4..checksum_offset]);

        let type_tag = read_u32(&mut cursor)?;
        let entity_type = EntityType::from_tag(type_tag).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unknown entity type tag: {}", type_tag),
            )
        })?;

        let mut id_buf = [0u8; 8];
        cursor.read_exact(&mut id_buf)?;
        let entity_id = i64::from_le_bytes(id_buf);

        let name = read_string(&mut cursor)?;

        let mut kind = [0u8; 1];
        cursor.read_exact(&mut kind)?;

        let value = match kind[0] {
            KIND_INTEGER => {
                let count = read_u32(&mut cursor)? as usize;
                let mut values = Vec::with_capacity(count.min(checksum_offset / 8));
                for _ in 0..count {
                    let mut v = [0u8; 8];
                    cursor.read_exact(&mut v)?;
                    values.push(i64::from_le_bytes(v));
                }
                AttributeValue::Integer(values)
            }
            KIND_TEXT => AttributeValue::Text(read_string(&mut cursor)?),
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Unknown value kind: {}", other),
                ))
            }
        };

        Ok((
            Self {
                entity_type,
                entity_id,
                name,
                value,
            },
            record_length,
        ))
    }
}

fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_string<R: Read>(reader: &mut R) -> io::Result<String> {
    let len = read_u32(reader)? as usize;
    let mut buf = Vec::new();
    reader.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "String extends past record body",
        ));
    }
    String::from_utf8(buf)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_record() -> AttributeRecord {
        AttributeRecord::new(
            EntityType::EdgeBlock,
            100,
            "Field@Species@type",
            AttributeValue::Integer(vec![1]),
        )
    }

    #[test]
    fn test_integer_record_roundtrip() {
        let record = type_record();
        let bytes = record.serialize();
        let (decoded, consumed) = AttributeRecord::deserialize(&bytes).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn test_text_record_roundtrip() {
        let record = AttributeRecord::new(
            EntityType::ElementBlock,
            -7,
            "Field@Species@suffices",
            AttributeValue::Text("h2o,gas,ch4,methane".into()),
        );
        let bytes = record.serialize();
        let (decoded, _) = AttributeRecord::deserialize(&bytes).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_consumes_only_first_record() {
        let mut bytes = type_record().serialize();
        let first_len = bytes.len();
        bytes.extend(type_record().serialize());
        let (_, consumed) = AttributeRecord::deserialize(&bytes).unwrap();
        assert_eq!(consumed, first_len);
    }

    #[test]
    fn test_checksum_detects_corruption() {
        let mut bytes = type_record().serialize();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;
        let err = AttributeRecord::deserialize(&bytes).unwrap_err();
        assert!(err.to_string().contains("Checksum mismatch"));
    }

    #[test]
    fn test_truncated_record() {
        let bytes = type_record().serialize();
        let err = AttributeRecord::deserialize(&bytes[..bytes.len() - 1]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_deterministic_serialization() {
        assert_eq!(type_record().serialize(), type_record().serialize());
    }
}
