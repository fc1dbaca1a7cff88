pub mod http_client;

pub use http_client::{backoff_delay, HttpAnalogyClient, FEEDBACK_PATH, GENERATE_PATH, MAX_BACKOFF};
