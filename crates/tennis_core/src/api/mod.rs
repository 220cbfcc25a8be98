pub mod json_api;

mod config_env;

pub use json_api::{
    report_schema_json, simulate_batch_json, simulate_match, simulate_match_json, BatchRequest,
    FormatSelector, MatchRequest,
};
