pub mod market_bmc;
pub mod static_data;

pub use market_bmc::*;
pub use static_data::*;
