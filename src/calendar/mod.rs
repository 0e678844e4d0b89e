//! Calendar views over the interview list: bucketing and the navigation cursor.

pub mod bucket;
pub mod cursor;
pub mod dates;
