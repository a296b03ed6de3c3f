use serde::{Deserialize, Serialize};

fn counter_suffix_default() -> String { return "counter".to_string() }
fn include_version_build_default() -> bool { return false }
fn strict_length_default() -> bool { return false }

/* Options are handed in by the caller, nothing here touches the filesystem */
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct DecoderOptions {
    /// Appended to the channel name for counter values, "P_CONS" becomes "P_CONScounter"
    #[serde(default="counter_suffix_default")]
    pub counter_suffix: String,
    /// Append "|MMmmpp" to the firmware version so versions can be compared as strings
    #[serde(default="include_version_build_default")]
    pub include_version_build: bool,
    /// Drop all OBIS blocks when the length field claims more than was received
    #[serde(default="strict_length_default")]
    pub strict_length: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            counter_suffix: counter_suffix_default(),
            include_version_build: include_version_build_default(),
            strict_length: strict_length_default(),
        }
    }
}
