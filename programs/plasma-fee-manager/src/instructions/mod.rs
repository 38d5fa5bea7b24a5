pub mod accrue;
pub mod harvest;
pub mod high_water_mark;
pub mod initialize;
pub mod set_dao_recipient;
pub mod update_fee_tables;

pub use accrue::*;
pub use harvest::*;
pub use high_water_mark::*;
pub use initialize::*;
pub use set_dao_recipient::*;
pub use update_fee_tables::*;
