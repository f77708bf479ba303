//! Domain types: daily bars and the sentiment records computed from them.

pub mod bar;
pub mod sentiment;

pub use bar::Bar;
pub use sentiment::{FearLevel, GreedLevel, SentimentRecord};
