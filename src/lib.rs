pub mod acis;
pub mod chart;
pub mod degree_days;
pub mod fetch;
pub mod forecast;
pub mod format;
pub mod locations;
pub mod mail;
pub mod report;
