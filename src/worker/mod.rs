pub mod error;
pub mod lifecycle;
pub mod network;
pub mod request;
pub mod storage;
