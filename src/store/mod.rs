pub mod counters;
pub mod kv;
