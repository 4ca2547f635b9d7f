//! Message-processing pipeline for charla.
//!
//! The pipeline sits between the HTTP boundary and the engine. Each call is
//! independent: validate the inbound text, optionally enrich it with caller
//! context, compose a prompt, invoke the engine, and extract a usable result.
//! Every failure mode — blank input, engine error, blank output — converges
//! to `None`; callers can only tell them apart from the logs.

pub mod compose;
pub mod enrich;
pub mod extract;
pub mod pipeline;

pub use compose::compose;
pub use enrich::enrich;
pub use extract::extract;
pub use pipeline::ChatPipeline;
