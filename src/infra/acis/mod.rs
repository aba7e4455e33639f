mod client;

pub use client::AcisClient;
