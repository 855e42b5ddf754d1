mod hashmap_pull_request_store;
mod hashmap_team_store;
mod postgres_pull_request_store;
mod postgres_team_store;

pub use hashmap_pull_request_store::*;
pub use hashmap_team_store::*;
pub use postgres_pull_request_store::*;
pub use postgres_team_store::*;
