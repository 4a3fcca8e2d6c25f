mod file_store;
mod http_fetcher;

pub use file_store::FileFilterStore;
pub use http_fetcher::HttpFilterFetcher;
