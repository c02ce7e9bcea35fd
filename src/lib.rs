pub mod aggregate;
pub mod chart;
pub mod clean;
pub mod config;
pub mod error;
pub mod explore;
pub mod export;
pub mod load;
pub mod pipeline;
pub mod table;
