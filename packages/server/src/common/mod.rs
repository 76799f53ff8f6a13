pub mod json;

pub use json::{extract_json, extract_json_or_error, is_error_record, JsonExtractError};
