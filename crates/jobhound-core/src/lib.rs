pub mod app_config;
pub mod config;
pub mod criteria;
pub mod error;
pub mod listing;
pub mod vocabulary;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use criteria::{AreaId, CriteriaBuilder, Employment, Schedule, SearchCriteria};
pub use error::{ConfigError, CriteriaError};
pub use listing::ListingRecord;
pub use vocabulary::{normalize_label, VocabEntry};
