//! Event rendering for the subscriber `herald::telemetry` installs.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// How telemetry renders `tracing` events on standard error.
///
/// Names parse case-insensitively, so `JSON` from an environment override
/// selects the same format as `json` from a configuration file.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, Display, EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// One flattened JSON object per event, for journald and log shippers.
    #[default]
    Json,
    /// One text line per event with its target, for terminals.
    Compact,
}

impl LogFormat {
    /// Returns whether events leave the process as JSON objects.
    #[must_use]
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Returns the name used in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
