pub mod ratio;
pub mod session;
pub mod trade;

pub use ratio::Ratio;
pub use session::Session;
pub use trade::{Direction, Trade};
