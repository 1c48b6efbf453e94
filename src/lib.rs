pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod influx;
pub mod ruuvi;
