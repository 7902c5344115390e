pub mod error;
pub mod payload;
pub mod response;
