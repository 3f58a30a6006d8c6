pub mod activity;
pub mod cache;
pub mod initialize;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod remote;
