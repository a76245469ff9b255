pub mod builder;
pub mod filter;
pub mod stability;

pub use builder::{Template, TemplateBuilder, TemplateMetadata};
pub use filter::QualityFilter;
pub use stability::stability_score;
