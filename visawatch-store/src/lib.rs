pub mod app_config;
pub mod records;
pub mod seed;

pub use records::RecordStore;
