use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};

use super::{Team, UserId};

/// Picks up to `count` distinct active members of `team` not listed in
/// `exclude`, uniformly at random and without regard to current review load.
///
/// When fewer than `count` members are eligible all of them are returned,
/// possibly none. The result is always a subset of the team's active members
/// minus `exclude`; its order carries no meaning.
pub fn select_reviewers<R>(
    team: &Team,
    exclude: &HashSet<UserId>,
    count: usize,
    rng: &mut R,
) -> Vec<UserId>
where
    R: Rng + ?Sized,
{
    let eligible: Vec<&UserId> = team
        .active_members()
        .map(|member| &member.user_id)
        .filter(|user_id| !exclude.contains(*user_id))
        .collect();

    eligible
        .choose_multiple(rng, count)
        .map(|user_id| (*user_id).clone())
        .collect()
}
