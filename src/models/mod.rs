pub mod jar;
pub mod member;
pub mod results;
pub mod suggestion;
pub mod vote;

/// Current UTC time in the storage format used across all tables.
pub(crate) fn now_utc() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
