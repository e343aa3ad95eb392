pub mod scorer;
pub mod strategy;

pub use scorer::IContextScorer;
pub use strategy::IContextStrategy;
