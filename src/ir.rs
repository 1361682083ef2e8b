pub mod format;
pub mod output;
pub mod samsung;
pub mod types;
