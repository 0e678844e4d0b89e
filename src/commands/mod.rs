pub mod agenda;
pub mod calendar;
pub mod desk;
pub mod detail;
pub mod jobs;
pub mod schedule;
