//! Network layer: one blocking request per invocation, typed outcomes.

pub(crate) mod envelope;
pub mod error;
pub mod response_fetcher;

#[cfg(test)]
pub(crate) mod test_server;
