use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

use super::structs::{ChannelDefinition, ChannelId};
use super::SpeedwireError;

const fn channel(id: ChannelId, name: &'static str, actual_unit: &'static str, counter_unit: Option<&'static str>) -> ChannelDefinition {
    ChannelDefinition { id, name, actual_unit, counter_unit }
}

/* <index>: (<name>, <unit of the actual value>, <unit of the counter value>) */
pub const SMA_CHANNELS: &[ChannelDefinition] = &[
    // totals
    channel(1, "P_CONS", "W", Some("kWh")),
    channel(2, "P_SUP", "W", Some("kWh")),
    channel(3, "S_CONS", "VA", Some("kVAh")),
    channel(4, "S_SUP", "VA", Some("kVAh")),
    channel(9, "Q_CONS", "VAr", Some("kVArh")),
    channel(10, "Q_SUP", "VAr", Some("kVArh")),
    channel(13, "COSPHI", "", None),
    // firmware 2.x and newer
    channel(14, "FREQ", "Hz", None),
    // phase 1
    channel(21, "P1_CONS", "W", Some("kWh")),
    channel(22, "P1_SUP", "W", Some("kWh")),
    channel(23, "S1_CONS", "VA", Some("kVAh")),
    channel(24, "S1_SUP", "VA", Some("kVAh")),
    channel(29, "Q1_CONS", "VAr", Some("kVArh")),
    channel(30, "Q1_SUP", "VAr", Some("kVArh")),
    channel(31, "I1", "A", None),
    channel(32, "U1", "V", None),
    channel(33, "COSPHI1", "", None),
    // phase 2
    channel(41, "P2_CONS", "W", Some("kWh")),
    channel(42, "P2_SUP", "W", Some("kWh")),
    channel(43, "S2_CONS", "VA", Some("kVAh")),
    channel(44, "S2_SUP", "VA", Some("kVAh")),
    channel(49, "Q2_CONS", "VAr", Some("kVArh")),
    channel(50, "Q2_SUP", "VAr", Some("kVArh")),
    channel(51, "I2", "A", None),
    channel(52, "U2", "V", None),
    channel(53, "COSPHI2", "", None),
    // phase 3
    channel(61, "P3_CONS", "W", Some("kWh")),
    channel(62, "P3_SUP", "W", Some("kWh")),
    channel(63, "S3_CONS", "VA", Some("kVAh")),
    channel(64, "S3_SUP", "VA", Some("kVAh")),
    channel(69, "Q3_CONS", "VAr", Some("kVArh")),
    channel(70, "Q3_SUP", "VAr", Some("kVArh")),
    channel(71, "I3", "A", None),
    channel(72, "U3", "V", None),
    channel(73, "COSPHI3", "", None),
    // sent on channel 144 with value type 0
    channel(0, "speedwire-version", "", None),
];

/*
 *  The meter sends its values in these steps:
 *
 *  power         0.1 W
 *  energy        1 Ws
 *  current       1 mA
 *  voltage       1 mV
 *  frequency     0.001 Hz
 *  power factor  0.001
 */
pub const SMA_UNIT_SCALES: &[(&str, u64)] = &[
    ("W", 10),
    ("VA", 10),
    ("VAr", 10),
    ("kWh", 3_600_000),
    ("kVAh", 3_600_000),
    ("kVArh", 3_600_000),
    ("A", 1000),
    ("V", 1000),
    ("Hz", 1000),
    ("", 1000),
];

#[derive(Debug, Clone)]
pub struct ChannelTable {
    definitions: Vec<ChannelDefinition>,
    by_id: HashMap<ChannelId, usize>,
}

impl ChannelTable {
    /* Duplicate ids are kept here and rejected by verify_tables */
    pub fn from_definitions(definitions: &[ChannelDefinition]) -> Self {
        let definitions = definitions.to_vec();
        let mut by_id = HashMap::new();
        for (pos, def) in definitions.iter().enumerate() {
            by_id.entry(def.id).or_insert(pos);
        }
        Self { definitions, by_id }
    }

    pub fn lookup(&self, id: ChannelId) -> Option<&ChannelDefinition> {
        self.by_id.get(&id).map(|pos| &self.definitions[*pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelDefinition> {
        self.definitions.iter()
    }
}

#[derive(Debug, Clone)]
pub struct UnitScaleTable {
    scales: HashMap<String, u64>,
}

impl UnitScaleTable {
    pub fn from_pairs(pairs: &[(&str, u64)]) -> Self {
        let scales = pairs.iter().map(|(unit, divisor)| (unit.to_string(), *divisor)).collect();
        Self { scales }
    }

    /// Divisor turning the raw integer into the display unit.
    /// `None` only happens for tables that never passed [`verify_tables`].
    pub fn scale(&self, unit: &str) -> Option<u64> {
        self.scales.get(unit).copied()
    }

    pub fn contains(&self, unit: &str) -> bool {
        self.scales.contains_key(unit)
    }
}

lazy_static! {
    pub static ref CHANNEL_TABLE: ChannelTable = ChannelTable::from_definitions(SMA_CHANNELS);
    pub static ref UNIT_SCALES: UnitScaleTable = UnitScaleTable::from_pairs(SMA_UNIT_SCALES);
}

pub fn lookup(id: ChannelId) -> Option<&'static ChannelDefinition> {
    CHANNEL_TABLE.lookup(id)
}

/// Channel ids must be unique and every unit the channel table references
/// must have a divisor.
pub fn verify_tables(channels: &ChannelTable, scales: &UnitScaleTable) -> Result<(), SpeedwireError> {
    let mut seen = HashSet::new();
    for def in channels.iter() {
        if !seen.insert(def.id) {
            return Err(SpeedwireError::DuplicateChannel { id: def.id });
        }
    }

    for def in channels.iter() {
        let units = std::iter::once(def.actual_unit).chain(def.counter_unit);
        for unit in units {
            if !scales.contains(unit) {
                return Err(SpeedwireError::InconsistentTables {
                    name: def.name.to_string(),
                    unit: unit.to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tables_are_consistent() {
        assert!(verify_tables(&CHANNEL_TABLE, &UNIT_SCALES).is_ok());
    }

    #[test]
    fn test_channel_ids_are_unique() {
        assert_eq!(CHANNEL_TABLE.iter().count(), SMA_CHANNELS.len());
        let ids: HashSet<ChannelId> = SMA_CHANNELS.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), SMA_CHANNELS.len());
    }

    #[test]
    fn test_lookup() {
        let p = lookup(1).unwrap();
        assert_eq!(p.name, "P_CONS");
        assert_eq!(p.actual_unit, "W");
        assert_eq!(p.counter_unit, Some("kWh"));

        let u = lookup(52).unwrap();
        assert_eq!(u.name, "U2");
        assert_eq!(u.counter_unit, None);

        assert_eq!(lookup(0).unwrap().name, "speedwire-version");
        assert!(lookup(5).is_none());
        assert!(lookup(999).is_none());
    }

    #[test]
    fn test_scales() {
        assert_eq!(UNIT_SCALES.scale("W"), Some(10));
        assert_eq!(UNIT_SCALES.scale("kWh"), Some(3_600_000));
        assert_eq!(UNIT_SCALES.scale("Hz"), Some(1000));
        assert_eq!(UNIT_SCALES.scale(""), Some(1000));
        assert_eq!(UNIT_SCALES.scale("MW"), None);
    }

    #[test]
    fn test_missing_unit_is_reported() {
        let channels = ChannelTable::from_definitions(&[
            channel(1, "P_CONS", "W", Some("kWh")),
            channel(2, "P_SUP", "W", Some("MWh")),
        ]);
        let scales = UnitScaleTable::from_pairs(&[("W", 10), ("kWh", 3_600_000)]);

        match verify_tables(&channels, &scales) {
            Err(SpeedwireError::InconsistentTables { name, unit }) => {
                assert_eq!(name, "P_SUP");
                assert_eq!(unit, "MWh");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_channel_id_is_rejected() {
        let channels = ChannelTable::from_definitions(&[
            channel(1, "FIRST", "W", None),
            channel(2, "OTHER", "W", None),
            channel(1, "SECOND", "W", None),
        ]);
        assert_eq!(channels.lookup(1).unwrap().name, "FIRST");
        assert_eq!(
            verify_tables(&channels, &UNIT_SCALES),
            Err(SpeedwireError::DuplicateChannel { id: 1 })
        );
    }
}
