pub mod creature;
pub mod manifest;
pub mod quiz_state;
