//! ABI decoding of Data Streams full reports
//!
//! A full report is `abi.encode(bytes32[3] context, bytes reportBlob,
//! bytes32[] rs, bytes32[] ss, bytes32 rawVs)`. Only the report blob is
//! decoded; its layout depends on the schema version carried in the first
//! two bytes of the feed ID.

use super::{FeedError, FeedId};
use crate::report::{Report, Value};
use num_bigint::{BigInt, Sign};

const WORD: usize = 32;

/// Word index of the report blob offset in the full report head
const REPORT_BLOB_OFFSET_WORD: usize = 3;

#[derive(Debug, Clone, Copy)]
enum Field {
    Bytes32,
    Uint32,
    Uint192,
    Int192,
}

const SCHEMA_V2: &[(&str, Field)] = &[
    ("feedId", Field::Bytes32),
    ("validFromTimestamp", Field::Uint32),
    ("observationsTimestamp", Field::Uint32),
    ("nativeFee", Field::Uint192),
    ("linkFee", Field::Uint192),
    ("expiresAt", Field::Uint32),
    ("benchmarkPrice", Field::Int192),
];

const SCHEMA_V3: &[(&str, Field)] = &[
    ("feedId", Field::Bytes32),
    ("validFromTimestamp", Field::Uint32),
    ("observationsTimestamp", Field::Uint32),
    ("nativeFee", Field::Uint192),
    ("linkFee", Field::Uint192),
    ("expiresAt", Field::Uint32),
    ("benchmarkPrice", Field::Int192),
    ("bid", Field::Int192),
    ("ask", Field::Int192),
];

const SCHEMA_V4: &[(&str, Field)] = &[
    ("feedId", Field::Bytes32),
    ("validFromTimestamp", Field::Uint32),
    ("observationsTimestamp", Field::Uint32),
    ("nativeFee", Field::Uint192),
    ("linkFee", Field::Uint192),
    ("expiresAt", Field::Uint32),
    ("price", Field::Int192),
    ("marketStatus", Field::Uint32),
];

/// Decode a hex-encoded full report (with or without `0x`)
pub fn decode_full_report_hex(full_report: &str) -> Result<Report, FeedError> {
    let digits = full_report.strip_prefix("0x").unwrap_or(full_report);
    let payload =
        hex::decode(digits).map_err(|e| FeedError::Decode(format!("invalid hex: {}", e)))?;
    decode_full_report(&payload)
}

/// Decode an ABI-encoded full report
pub fn decode_full_report(payload: &[u8]) -> Result<Report, FeedError> {
    let offset = read_usize(payload, REPORT_BLOB_OFFSET_WORD * WORD)?;
    let len = read_usize(payload, offset)?;
    let start = offset
        .checked_add(WORD)
        .ok_or_else(|| FeedError::Decode("report blob offset overflow".to_string()))?;
    let blob = start
        .checked_add(len)
        .and_then(|end| payload.get(start..end))
        .ok_or_else(|| FeedError::Decode("report blob out of bounds".to_string()))?;
    decode_report_blob(blob)
}

/// Decode a report blob according to the schema named by its feed ID
pub fn decode_report_blob(blob: &[u8]) -> Result<Report, FeedError> {
    let feed_id = FeedId::from(*word(blob, 0)?);
    let schema = match feed_id.schema_version() {
        2 => SCHEMA_V2,
        3 => SCHEMA_V3,
        4 => SCHEMA_V4,
        v => return Err(FeedError::UnsupportedVersion(v)),
    };

    let mut fields = Vec::with_capacity(schema.len());
    for (index, (name, field)) in schema.iter().enumerate() {
        let w = word(blob, index * WORD)?;
        let value = decode_field(w, *field)
            .map_err(|reason| FeedError::Decode(format!("{}: {}", name, reason)))?;
        fields.push((name.to_string(), value));
    }

    Ok(Value::Object(fields))
}

fn decode_field(w: &[u8; WORD], field: Field) -> Result<Value, &'static str> {
    match field {
        Field::Bytes32 => Ok(Value::String(format!("0x{}", hex::encode(w)))),
        Field::Uint32 => {
            if w[..WORD - 4].iter().any(|b| *b != 0) {
                return Err("uint32 out of range");
            }
            let n = u32::from_be_bytes([w[28], w[29], w[30], w[31]]);
            Ok(Value::from(n))
        }
        Field::Uint192 => {
            if w[..8].iter().any(|b| *b != 0) {
                return Err("uint192 out of range");
            }
            Ok(Value::BigInt(BigInt::from_bytes_be(Sign::Plus, w)))
        }
        Field::Int192 => {
            // Sign extension must fill the top 8 bytes
            let fill = if w[8] & 0x80 != 0 { 0xff } else { 0x00 };
            if w[..8].iter().any(|b| *b != fill) {
                return Err("int192 out of range");
            }
            Ok(Value::BigInt(BigInt::from_signed_bytes_be(w)))
        }
    }
}

fn word(data: &[u8], at: usize) -> Result<&[u8; WORD], FeedError> {
    at.checked_add(WORD)
        .and_then(|end| data.get(at..end))
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| FeedError::Decode(format!("truncated payload at byte {}", at)))
}

fn read_usize(data: &[u8], at: usize) -> Result<usize, FeedError> {
    let w = word(data, at)?;
    if w[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(FeedError::Decode(format!("offset too large at byte {}", at)));
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&w[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(tail))
        .map_err(|_| FeedError::Decode(format!("offset too large at byte {}", at)))
}
