mod data_stores;
mod error;
mod pull_request;
mod pull_request_id;
mod pull_request_name;
mod reviewer_selector;
mod stats;
mod team;
mod team_name;
mod user;
mod user_id;
mod username;
mod validation;

pub use data_stores::*;
pub use error::*;
pub use pull_request::*;
pub use pull_request_id::*;
pub use pull_request_name::*;
pub use reviewer_selector::*;
pub use stats::*;
pub use team::*;
pub use team_name::*;
pub use user::*;
pub use user_id::*;
pub use username::*;
