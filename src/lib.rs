#[macro_use]
extern crate log;

use thiserror::Error;

pub mod climate;
pub mod ir;
pub mod settings;

#[derive(Error, Debug)]
pub enum GpioError {
    #[error("Could not initialize gpio")]
    Initialization,
    #[error("Could not get pin {0}")]
    Pin(u8),
}
