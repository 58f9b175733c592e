use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackError>;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("buffer too short: needed {needed} bytes, {available} available")]
    ShortBuffer { needed: usize, available: usize },
    #[error("unknown property {0}")]
    UnknownProperty(i64),
    #[error("unsupported property type: {0}")]
    UnsupportedType(String),
    #[error("data value cannot exceed 127 bytes (got {0})")]
    ValueTooLarge(usize),
    #[error("decode mismatch: expected {expected}, found tag 0x{tag:02X}")]
    DecodeMismatch { expected: &'static str, tag: u8 },
    #[error("unknown message type {0}")]
    UnknownMessageType(u32),
    #[error("record write at offset {offset}+{len} exceeds capacity {capacity}")]
    InvalidOffset {
        offset: usize,
        len: usize,
        capacity: usize,
    },
    #[error("invalid property id range: min {min} exceeds max {max}")]
    InvalidRange { min: i64, max: i64 },
    #[error("action {0} not found")]
    ActionNotFound(i32),
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<toml::de::Error> for TrackError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for TrackError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for TrackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
