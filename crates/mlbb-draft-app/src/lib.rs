// Library root: data loading, persistence and script replay around the
// draft engine. The binary is a thin wrapper over `app`.

pub mod app;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod db;
pub mod replay;
