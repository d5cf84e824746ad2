mod coverage;
mod market;
mod status;

pub use coverage::coverage_request;
pub use market::{
    market_competition, market_count, market_data_available, market_income, market_rdof,
    market_size,
};
pub use status::status;
