#[cfg(test)]
mod test_utils;

pub mod comparator;
pub mod error;
pub mod ffi;
pub mod options;
