use super::channel_definitions::UnitScaleTable;
use super::structs::{ObisRecord, ObisValueType};
use super::utils::{read_u32_be, read_u64_be};
use super::SpeedwireError;

pub const OBIS_HEADER_LENGTH: usize = 4;
/// Vendor specific channel SMA uses for the firmware version
pub const VERSION_CHANNEL: u8 = 144;

const TYPE_ACTUAL: u8 = 4;
const TYPE_COUNTER: u8 = 8;
const TYPE_VERSION: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue {
    Actual(u32),
    Counter(u64),
    Version([u8; 4]),
    Skipped,
}

pub fn decode_obis_header(data: &[u8], position: usize) -> Result<ObisRecord, SpeedwireError> {
    let end = position.saturating_add(OBIS_HEADER_LENGTH);
    let bytes = data.get(position..end).ok_or(SpeedwireError::TruncatedTelegram {
        needed: end,
        actual: data.len(),
    })?;

    Ok(ObisRecord {
        channel: bytes[0],
        index: bytes[1],
        value_type: bytes[2],
        tariff: bytes[3],
    })
}

pub fn classify(record: &ObisRecord) -> ObisValueType {
    match (record.value_type, record.channel) {
        (TYPE_ACTUAL, _) => ObisValueType::Actual,
        (TYPE_COUNTER, _) => ObisValueType::Counter,
        (TYPE_VERSION, VERSION_CHANNEL) => ObisValueType::Version,
        _ => ObisValueType::Unrecognized,
    }
}

/// Read the value following the OBIS header at `position`.
/// Returns the value and the number of bytes the whole block occupies.
pub fn decode_value(kind: ObisValueType, data: &[u8], position: usize) -> Result<(RawValue, usize), SpeedwireError> {
    let stride = kind.stride();
    let value_start = position.saturating_add(OBIS_HEADER_LENGTH);
    let truncated = SpeedwireError::TruncatedTelegram {
        needed: position.saturating_add(stride),
        actual: data.len(),
    };

    let value = match kind {
        ObisValueType::Actual => RawValue::Actual(read_u32_be(data, value_start).ok_or(truncated)?),
        ObisValueType::Counter => RawValue::Counter(read_u64_be(data, value_start).ok_or(truncated)?),
        ObisValueType::Version => {
            let bytes = data.get(value_start..value_start.saturating_add(4)).ok_or(truncated)?;
            RawValue::Version([bytes[0], bytes[1], bytes[2], bytes[3]])
        }
        ObisValueType::Unrecognized => RawValue::Skipped,
    };

    Ok((value, stride))
}

pub fn scale_value(raw: u64, unit: &str, scales: &UnitScaleTable) -> Option<f64> {
    let divisor = scales.scale(unit)?;
    Some(raw as f64 / divisor as f64)
}
