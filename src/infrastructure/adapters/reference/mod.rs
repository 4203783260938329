//! Reference Audio Fetcher Adapters

mod http_reference_fetcher;

pub use http_reference_fetcher::HttpReferenceFetcher;
