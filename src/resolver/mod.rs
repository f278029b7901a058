//! Previous-version lookup from version-control tags

pub mod previous_version;

pub use previous_version::PreviousVersionResolver;
