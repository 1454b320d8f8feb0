pub mod domain;
pub mod errors;
pub mod export;
pub mod ports;
pub mod services;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::CoreError;
