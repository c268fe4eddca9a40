// File I/O: CSV code lists in, CSV result table out

pub mod csv;
pub mod error;

pub use error::IoError;
