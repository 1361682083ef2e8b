pub mod samsung;

pub use samsung::Samsung;
