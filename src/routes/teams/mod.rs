mod add_team;
mod get_team;

pub use add_team::{add_team, AddTeamRequest, TeamMemberRequest, TeamResponse};
pub use get_team::get_team;
