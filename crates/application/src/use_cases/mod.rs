pub mod filters;

pub use filters::{
    AddFilterUseCase, ListFiltersUseCase, RefreshFiltersUseCase, RemoveFilterUseCase,
    SetFilterEnabledUseCase,
};
