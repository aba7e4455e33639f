pub mod mailer;
pub mod station_data;
