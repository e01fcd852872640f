pub mod eve_model;
pub mod isk;
pub mod market_order;
pub mod trading;

pub use eve_model::*;
pub use isk::*;
pub use market_order::*;
pub use trading::*;
