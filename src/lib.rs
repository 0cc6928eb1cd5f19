//! Reconciles player statistics scraped from three football-data sites into one
//! table keyed on (player, club), then adds derived rate/differential columns.
//!
//! Flow: [`sources`] normalise each raw extract, [`table::merge`] outer-joins
//! them, [`derived::derive`] adds computed columns, and [`pipeline`] runs the
//! three sources concurrently and sequences the rest.

pub mod config;
pub mod derived;
pub mod pipeline;
pub mod session;
pub mod sources;
pub mod table;
pub mod telemetry;

pub use pipeline::{run_pipeline, Pipeline, PipelineFailed, PipelineOutput, SourceFetchers};
