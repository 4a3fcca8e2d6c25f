mod filters;
mod use_cases;

pub use filters::FilterServices;
pub use use_cases::UseCases;
