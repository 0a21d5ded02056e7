pub mod controller;
pub mod data_client;
pub mod engine;
pub mod error;
pub mod icons;
pub mod protocol;
pub mod selector;
pub mod sprite;
