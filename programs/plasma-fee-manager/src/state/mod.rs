pub mod fee_manager;

pub use fee_manager::*;
