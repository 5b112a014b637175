pub mod ai;
pub mod calculators;
pub mod commands;
pub mod conditions;
pub mod driver;
pub mod engine;
pub mod rng;
pub mod runner;
pub mod state;
pub mod stats;

#[cfg(test)]
mod tests;
