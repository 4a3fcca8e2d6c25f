mod add_filter;
mod list_filters;
mod refresh_filters;
mod remove_filter;
mod set_filter_enabled;

pub use add_filter::AddFilterUseCase;
pub use list_filters::ListFiltersUseCase;
pub use refresh_filters::RefreshFiltersUseCase;
pub use remove_filter::RemoveFilterUseCase;
pub use set_filter_enabled::SetFilterEnabledUseCase;
