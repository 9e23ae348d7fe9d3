pub mod migrate;
pub mod request;
