//! Durable storage contracts and adapters for desktop session records.

pub mod file_session;
pub mod session_record;
