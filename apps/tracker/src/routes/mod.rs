pub mod cards;
pub mod journal;
pub mod stats;
