use serde::Serialize;

/// Key into the channel table. This is the OBIS index byte, the wider type
/// only exists so lookups for ids outside a byte are expressible.
pub type ChannelId = u16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDefinition {
    pub id: ChannelId,
    pub name: &'static str,
    pub actual_unit: &'static str,
    pub counter_unit: Option<&'static str>,
}

/// Fixed fields of the Speedwire header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelegramHeader {
    /// Payload length plus the 16 byte offset of the length field
    pub total_length: usize,
    pub serial: u32,
    pub timestamp: u32,
}

/*
 *  |----------|----------|----------|----------|
 *  | BYTE 0   | BYTE 1   | BYTE 2   | BYTE 3   |
 *  | Channel  | Index    | Type     | Tariff   |
 *  |----------|----------|----------|----------|
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObisRecord {
    pub channel: u8,
    pub index: u8,
    pub value_type: u8,
    pub tariff: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObisValueType {
    Actual,
    Counter,
    Version,
    Unrecognized,
}

impl ObisValueType {
    /// Number of bytes the block occupies including its 4 byte header
    pub fn stride(&self) -> usize {
        match self {
            ObisValueType::Counter => 12,
            ObisValueType::Actual | ObisValueType::Version | ObisValueType::Unrecognized => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    Special,
    Alpha,
    Beta,
    Release,
    Experimental,
    NoRevision,
}

impl ReleaseType {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ReleaseType::Special),
            2 => Some(ReleaseType::Alpha),
            3 => Some(ReleaseType::Beta),
            4 => Some(ReleaseType::Release),
            5 => Some(ReleaseType::Experimental),
            6 => Some(ReleaseType::NoRevision),
            _ => None,
        }
    }

    pub fn suffix(&self) -> char {
        match self {
            ReleaseType::Special => 'S',
            ReleaseType::Alpha => 'A',
            ReleaseType::Beta => 'B',
            ReleaseType::Release => 'R',
            ReleaseType::Experimental => 'E',
            ReleaseType::NoRevision => 'N',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MeasurementValue {
    Integer(u64),
    Number(f64),
    Text(String),
}

impl MeasurementValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MeasurementValue::Integer(v) => Some(*v as f64),
            MeasurementValue::Number(v) => Some(*v),
            MeasurementValue::Text(_) => None,
        }
    }
}

impl From<MeasurementValue> for serde_json::Value {
    fn from(value: MeasurementValue) -> Self {
        match value {
            MeasurementValue::Integer(v) => v.into(),
            MeasurementValue::Number(v) => v.into(),
            MeasurementValue::Text(v) => v.into(),
        }
    }
}

/// Names of the two records every telegram starts with
pub const SERIAL_RECORD: &str = "serial";
pub const TIMESTAMP_RECORD: &str = "timestamp";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRecord {
    pub name: String,
    pub value: MeasurementValue,
    pub unit: String,
}

impl MeasurementRecord {
    pub fn new(name: impl Into<String>, value: MeasurementValue, unit: impl Into<String>) -> Self {
        MeasurementRecord {
            name: name.into(),
            value,
            unit: unit.into(),
        }
    }
}
