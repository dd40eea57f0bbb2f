//! Built-in strategy families.
//!
//! Each family is a factory-built struct implementing [`Strategy`]; any
//! internal state (confirmation streaks) lives on the instance, so one
//! instance serves exactly one forward pass over one bar slice.
//!
//! [`Strategy`]: crate::strategy::Strategy

pub mod breakout;
pub mod mean_reversion;
pub mod momentum;

pub use breakout::ChannelBreakout;
pub use mean_reversion::MeanReversion;
pub use momentum::Momentum;
