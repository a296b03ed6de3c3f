//! Speedwire telegram decoding for SMA energy meters
//!
//! The meter broadcasts its readings as UDP telegrams on the multicast group
//! 239.12.255.254, port 9522. This library turns one such telegram into an
//! ordered list of named, unit tagged measurements. Receiving the datagrams
//! and publishing the results is left to the caller.

pub mod config;
pub mod diagnostics;
pub mod models;
pub mod metering_speedwire;

// Re-export common types for easier access
pub use config::DecoderOptions;
pub use diagnostics::{DiagnosticSink, LogSink, NullSink, Severity};
pub use models::{DeviceProtocol, MeteringData};
pub use metering_speedwire::{SpeedwireDecoder, SpeedwireError};
pub use metering_speedwire::structs::{MeasurementRecord, MeasurementValue};

pub fn get_unix_ts() -> u64 {
    return std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
}
