pub mod client;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod preview;
pub mod rate_limit;
pub mod source;
pub mod types;

pub use client::HhClient;
pub use error::ListingError;
pub use normalize::{normalize_listing, render_salary};
pub use pipeline::{AggregationPipeline, DetailFailure, PageFailure, SearchReport};
pub use preview::render_preview;
pub use rate_limit::TokenBucket;
pub use source::ListingSource;
pub use types::{Employer, Salary, VacancyDetail, VacancyItem, VacancyPage};
