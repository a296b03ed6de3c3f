use thiserror::Error;

use crate::config::DecoderOptions;
use crate::diagnostics::{DiagnosticSink, LogSink, Severity};
use crate::models::{DeviceProtocol, MeteringData, TransmissionValueType};

pub mod structs;
pub mod channel_definitions;
pub mod obis_parser;
pub mod utils;

use channel_definitions::{ChannelTable, UnitScaleTable, CHANNEL_TABLE, UNIT_SCALES};
use obis_parser::RawValue;
use structs::*;
use utils::{format_version, read_u16_be, read_u32_be};

pub const SMA_MAGIC: &[u8; 3] = b"SMA";
/// Offset of the 2 byte payload length field
pub const LENGTH_FIELD_OFFSET: usize = 12;
/// Added to the payload length to get the usable telegram length
pub const LENGTH_OFFSET: usize = 16;
pub const SERIAL_OFFSET: usize = 20;
pub const TIMESTAMP_OFFSET: usize = 24;
/// First OBIS block, also the minimum length of a telegram
pub const HEADER_LENGTH: usize = 28;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpeedwireError {
    #[error("Not a Speedwire telegram")]
    NotATelegram,
    #[error("Telegram truncated: need {needed} bytes, got {actual}")]
    TruncatedTelegram { needed: usize, actual: usize },
    #[error("Unrecognized channel {id}")]
    UnrecognizedChannel { id: ChannelId },
    #[error("OBIS: unknown datatype: channel: {channel} index: {index} type: {value_type}")]
    UnrecognizedValueType { channel: u8, index: u8, value_type: u8 },
    #[error("Channel {name} uses unit '{unit}' which has no scale")]
    InconsistentTables { name: String, unit: String },
    #[error("Channel id {id} is defined more than once")]
    DuplicateChannel { id: ChannelId },
}

pub fn parse_header(data: &[u8]) -> Result<TelegramHeader, SpeedwireError> {
    if !data.starts_with(SMA_MAGIC) {
        return Err(SpeedwireError::NotATelegram);
    }

    let truncated = || SpeedwireError::TruncatedTelegram { needed: HEADER_LENGTH, actual: data.len() };
    let payload_length = read_u16_be(data, LENGTH_FIELD_OFFSET).ok_or_else(truncated)?;
    let serial = read_u32_be(data, SERIAL_OFFSET).ok_or_else(truncated)?;
    let timestamp = read_u32_be(data, TIMESTAMP_OFFSET).ok_or_else(truncated)?;

    Ok(TelegramHeader {
        total_length: payload_length as usize + LENGTH_OFFSET,
        serial,
        timestamp,
    })
}

/// Turns Speedwire datagrams into measurement records.
///
/// The tables are checked once on construction, after that decoding never
/// fails: malformed input only shortens the output and is reported to the
/// diagnostics sink.
pub struct SpeedwireDecoder {
    channels: ChannelTable,
    scales: UnitScaleTable,
    options: DecoderOptions,
    diagnostics: Box<dyn DiagnosticSink>,
}

impl SpeedwireDecoder {
    pub fn new() -> Result<Self, SpeedwireError> {
        Self::with_tables(CHANNEL_TABLE.clone(), UNIT_SCALES.clone())
    }

    pub fn with_tables(channels: ChannelTable, scales: UnitScaleTable) -> Result<Self, SpeedwireError> {
        channel_definitions::verify_tables(&channels, &scales)?;
        Ok(Self {
            channels,
            scales,
            options: DecoderOptions::default(),
            diagnostics: Box::new(LogSink),
        })
    }

    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_diagnostics(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.diagnostics = Box::new(sink);
        self
    }

    fn report(&self, err: &SpeedwireError, severity: Severity) {
        self.diagnostics.log(&err.to_string(), severity);
    }

    pub fn decode(&self, data: &[u8]) -> Vec<MeasurementRecord> {
        let header = match parse_header(data) {
            Ok(header) => header,
            Err(e) => {
                self.report(&e, Severity::Debug);
                return Vec::new();
            }
        };

        let mut records = vec![
            MeasurementRecord::new(SERIAL_RECORD, MeasurementValue::Integer(header.serial as u64), ""),
            MeasurementRecord::new(TIMESTAMP_RECORD, MeasurementValue::Integer(header.timestamp as u64), ""),
        ];

        let mut end = header.total_length;
        if end > data.len() {
            self.report(&SpeedwireError::TruncatedTelegram { needed: end, actual: data.len() }, Severity::Warning);
            if self.options.strict_length {
                return records;
            }
            end = data.len();
        }
        let payload = &data[..end];

        let mut position = HEADER_LENGTH;
        while position < payload.len() {
            let obis = match obis_parser::decode_obis_header(payload, position) {
                Ok(obis) => obis,
                Err(e) => {
                    self.report(&e, Severity::Warning);
                    break;
                }
            };

            let kind = obis_parser::classify(&obis);
            if kind == ObisValueType::Unrecognized {
                self.report(&SpeedwireError::UnrecognizedValueType {
                    channel: obis.channel,
                    index: obis.index,
                    value_type: obis.value_type,
                }, Severity::Debug);
            }

            let (raw, stride) = match obis_parser::decode_value(kind, payload, position) {
                Ok(decoded) => decoded,
                Err(e) => {
                    self.report(&e, Severity::Warning);
                    break;
                }
            };
            position += stride;

            if let Some(record) = self.resolve(&obis, raw) {
                records.push(record);
            }
        }

        records
    }

    /// Same as [`decode`](Self::decode) but wrapped for publishing, `None` if
    /// the buffer is not a telegram at all.
    pub fn decode_metering(&self, data: &[u8]) -> Option<MeteringData> {
        let header = parse_header(data).ok()?;
        let records = self.decode(data);

        let mut md = MeteringData::new(DeviceProtocol::Speedwire);
        md.id = format!("speedwire-{}", header.serial);
        md.meter_name = format!("SMA-EM {}", header.serial);
        md.transmission_time = crate::get_unix_ts();
        md.transmission_type = TransmissionValueType::Now;
        md.metered_time = header.timestamp as u64;
        md.metered_values = utils::to_metered_values(&records);
        Some(md)
    }

    fn resolve(&self, obis: &ObisRecord, raw: RawValue) -> Option<MeasurementRecord> {
        if raw == RawValue::Skipped {
            return None;
        }

        let id = obis.index as ChannelId;
        let def = match self.channels.lookup(id) {
            Some(def) => def,
            None => {
                self.report(&SpeedwireError::UnrecognizedChannel { id }, Severity::Debug);
                return None;
            }
        };

        match raw {
            RawValue::Actual(v) => {
                let value = obis_parser::scale_value(v as u64, def.actual_unit, &self.scales)?;
                Some(MeasurementRecord::new(def.name, MeasurementValue::Number(value), def.actual_unit))
            }
            RawValue::Counter(v) => {
                let Some(unit) = def.counter_unit else {
                    self.diagnostics.log(&format!("Channel {} has no counter unit, counter skipped", def.name), Severity::Debug);
                    return None;
                };
                let value = obis_parser::scale_value(v, unit, &self.scales)?;
                let name = format!("{}{}", def.name, self.options.counter_suffix);
                Some(MeasurementRecord::new(name, MeasurementValue::Number(value), unit))
            }
            RawValue::Version(bytes) => {
                let version = format_version(bytes, self.options.include_version_build);
                Some(MeasurementRecord::new(def.name, MeasurementValue::Text(version), def.actual_unit))
            }
            RawValue::Skipped => None,
        }
    }
}
