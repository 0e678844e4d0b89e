use chrono::{NaiveDate, TimeZone, Utc};

use crate::calendar::dates::local_today;
use crate::output::format::{detect_output_mode, OutputMode};

/// Output mode plus the zone every date is displayed and entered in.
///
/// The zone is a full `TimeZone`, so each instant is converted with the
/// offset in force at that instant rather than one offset captured at startup.
pub struct RunContext<Tz: TimeZone> {
    pub output_mode: OutputMode,
    pub tz: Tz,
}

impl<Tz: TimeZone> RunContext<Tz> {
    /// Create context from CLI arguments
    pub fn from_args(json: bool, no_color: bool, tz: Tz) -> Self {
        if no_color {
            colored::control::set_override(false);
        }

        RunContext {
            output_mode: detect_output_mode(json),
            tz,
        }
    }

    /// Today's date in the display zone, read fresh on every call.
    pub fn today(&self) -> NaiveDate {
        local_today(Utc::now(), &self.tz)
    }
}
