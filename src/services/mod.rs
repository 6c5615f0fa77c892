pub mod backend;
pub mod expiry;
