// Course recommendation engine.
// Data gathering is async (one batch fetch per request); everything after it is
// pure, synchronous scoring over the fetched snapshot.

pub mod clusters;
pub mod engine;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod pg_source;
pub mod prerequisites;
pub mod scoring;
pub mod source;
pub mod vectors;
pub mod weights;
