pub mod config;
pub mod feedback;
pub mod session;
pub mod stats;
