pub mod config_manager;
pub mod controller;
pub mod error;
pub mod form_state;
pub mod star_rating;
pub mod traits;
pub mod types;

pub use config_manager::{
    AnalogyConfig, ConfigError, ConfigManager, LoggingConfig, ServiceConfig, MAX_RETRIES_LIMIT,
};
pub use controller::AnalogyFormController;
pub use error::*;
pub use form_state::{
    FormState, Phase, RequestToken, FEEDBACK_ERROR_MESSAGE, GENERATE_ERROR_MESSAGE,
};
pub use star_rating::StarRating;
pub use traits::*;
pub use types::*;
