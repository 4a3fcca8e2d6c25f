mod filter_fetcher;
mod filter_store;
mod filtering_engine;

pub use filter_fetcher::FilterFetcher;
pub use filter_store::FilterStore;
pub use filtering_engine::FilteringEnginePort;
