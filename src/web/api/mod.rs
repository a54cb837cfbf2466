pub mod error;
pub mod imaging;
