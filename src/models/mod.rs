use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeviceProtocol {
    Speedwire,
}

/* Speedwire meters push live readings only */
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TransmissionValueType {
    Now,
}

/// One decoded telegram ready to be handed to a publisher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeteringData {
    pub id: String,
    pub meter_name: String,
    pub protocol: DeviceProtocol,
    /// Unix time when the telegram was decoded
    pub transmission_time: u64,
    pub transmission_type: TransmissionValueType,
    /// Meter relative ticker taken from the telegram, not a unix time
    pub metered_time: u64,
    pub metered_values: serde_json::Map<String, serde_json::Value>,
}

impl MeteringData {
    pub fn new(protocol: DeviceProtocol) -> Self {
        MeteringData {
            id: "".to_string(),
            meter_name: "".to_string(),
            protocol,
            transmission_time: 0,
            transmission_type: TransmissionValueType::Now,
            metered_time: 0,
            metered_values: serde_json::Map::new(),
        }
    }
}
