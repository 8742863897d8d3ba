//! Pure helper functions shared by the domain types

pub mod timestamp;
pub mod title;
