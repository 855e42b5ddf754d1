pub mod data_stores;
pub mod review_engine;

pub use review_engine::ReviewEngine;
