pub mod aggregates;
pub mod columns;
pub mod derive;
pub mod error;
pub mod outliers;
pub mod pipeline;
pub mod segment;
pub mod streams;
