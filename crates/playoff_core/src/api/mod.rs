pub mod json_api;

pub use json_api::{
    run_request, simulate_season_json, QualificationStatus, SeasonRequest, SeasonResponse,
    TeamOdds,
};
