pub mod clock;
pub mod filename;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;

pub use clock::{Clock, SystemClock};
pub use filename::{contains_path_traversal, sanitize_path_component, validate_flat_filename};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
