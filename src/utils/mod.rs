// src/utils/mod.rs

pub mod csv;
pub mod format;
pub mod redact;
