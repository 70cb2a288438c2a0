#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod rank;
pub mod time;

pub use error::Error;
pub use rank::Rank;
pub use time::Clock;
