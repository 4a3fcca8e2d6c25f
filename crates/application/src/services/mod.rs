mod filter_registry;

pub use filter_registry::{FilterRegistry, RefreshedFilter, RegistryState};
