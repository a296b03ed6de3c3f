use super::structs::{MeasurementRecord, ReleaseType, SERIAL_RECORD, TIMESTAMP_RECORD};

pub fn read_u16_be(data: &[u8], start: usize) -> Option<u16> {
    let bytes = data.get(start..start.checked_add(2)?)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

pub fn read_u32_be(data: &[u8], start: usize) -> Option<u32> {
    let bytes: [u8; 4] = data.get(start..start.checked_add(4)?)?.try_into().ok()?;
    Some(u32::from_be_bytes(bytes))
}

pub fn read_u64_be(data: &[u8], start: usize) -> Option<u64> {
    let bytes: [u8; 8] = data.get(start..start.checked_add(8)?)?.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

/* [major, minor, patch, revision] -> "1.02.03.R" */
pub fn format_version(raw: [u8; 4], include_build: bool) -> String {
    let [major, minor, patch, revision] = raw;
    let mut version = format!("{}.{:02}.{:02}", major, minor, patch);

    if let Some(release) = ReleaseType::from_code(revision) {
        version.push('.');
        version.push(release.suffix());
    }

    if include_build {
        version.push_str(&format!("|{:02x}{:02x}{:02x}", major, minor, patch));
    }

    version
}

/// Collapse records into the metered values map published per meter.
/// The first record for a name wins, later duplicates are dropped. Every
/// measurement gets a `<name>_unit` key, even a unitless one like COSPHI.
pub fn to_metered_values(records: &[MeasurementRecord]) -> serde_json::Map<String, serde_json::Value> {
    let mut values = serde_json::Map::new();

    for record in records {
        if values.contains_key(&record.name) {
            continue;
        }
        values.insert(record.name.clone(), record.value.clone().into());
        if record.name != SERIAL_RECORD && record.name != TIMESTAMP_RECORD {
            values.insert(format!("{}_unit", record.name), record.unit.clone().into());
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metering_speedwire::structs::MeasurementValue;

    #[test]
    fn test_readers() {
        let data = [0x00, 0x00, 0x05, 0xDC, 0x01, 0x02, 0x03, 0x04, 0x05];
        assert_eq!(read_u16_be(&data, 2), Some(1500));
        assert_eq!(read_u32_be(&data, 0), Some(1500));
        assert_eq!(read_u64_be(&data, 1), Some(0x0005DC0102030405));
        assert_eq!(read_u32_be(&data, 6), None);
        assert_eq!(read_u64_be(&data, 2), None);
        assert_eq!(read_u16_be(&data, usize::MAX), None);
    }

    #[test]
    fn test_format_version() {
        assert_eq!(format_version([1, 2, 3, 4], false), "1.02.03.R");
        assert_eq!(format_version([2, 0, 18, 1], false), "2.00.18.S");
        assert_eq!(format_version([1, 2, 3, 0], false), "1.02.03");
        assert_eq!(format_version([1, 2, 3, 200], false), "1.02.03");
        assert_eq!(format_version([2, 3, 4, 6], true), "2.03.04.N|020304");
    }

    #[test]
    fn test_metered_values_first_seen_wins() {
        let records = vec![
            MeasurementRecord::new("serial", MeasurementValue::Integer(7), ""),
            MeasurementRecord::new("P_CONS", MeasurementValue::Number(150.0), "W"),
            MeasurementRecord::new("P_CONS", MeasurementValue::Number(99.0), "W"),
        ];

        let values = to_metered_values(&records);
        assert_eq!(values.len(), 3);
        assert_eq!(values["serial"], serde_json::json!(7));
        assert_eq!(values["P_CONS"], serde_json::json!(150.0));
        assert_eq!(values["P_CONS_unit"], serde_json::json!("W"));
        assert!(!values.contains_key("serial_unit"));
    }

    #[test]
    fn test_unitless_measurement_keeps_unit_key() {
        let records = vec![
            MeasurementRecord::new("serial", MeasurementValue::Integer(7), ""),
            MeasurementRecord::new("timestamp", MeasurementValue::Integer(8), ""),
            MeasurementRecord::new("COSPHI", MeasurementValue::Number(0.98), ""),
            MeasurementRecord::new("speedwire-version", MeasurementValue::Text("2.00.18.R".to_string()), ""),
        ];

        let values = to_metered_values(&records);
        assert_eq!(values["COSPHI"], serde_json::json!(0.98));
        assert_eq!(values["COSPHI_unit"], serde_json::json!(""));
        assert_eq!(values["speedwire-version_unit"], serde_json::json!(""));
        assert!(!values.contains_key("serial_unit"));
        assert!(!values.contains_key("timestamp_unit"));
        assert_eq!(values.len(), 6);
    }
}
