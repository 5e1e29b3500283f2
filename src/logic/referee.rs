//! Referee assignment with duty balancing.

use crate::models::{Match, ScheduleWarning, Team};

/// Give each match (in order) a referee: the non-playing team with the fewest duties so
/// far, ties going to the team listed first in `teams`.
///
/// Matches with no eligible referee keep `referee_team_id = None` and are reported as
/// warnings.
pub fn assign_referees(matches: &mut [Match], teams: &[Team]) -> Vec<ScheduleWarning> {
    let mut duties = vec![0u32; teams.len()];
    let mut warnings = Vec::new();

    for m in matches.iter_mut() {
        let pick = teams
            .iter()
            .enumerate()
            .filter(|(_, t)| !m.involves(t.id))
            .min_by_key(|&(i, _)| (duties[i], i))
            .map(|(i, _)| i);

        match pick {
            Some(i) => {
                duties[i] += 1;
                m.referee_team_id = Some(teams[i].id);
            }
            None => {
                log::warn!(
                    "No eligible referee for match {} in pool {:?}",
                    m.id,
                    m.pool_name
                );
                m.referee_team_id = None;
                warnings.push(ScheduleWarning::NoEligibleReferee {
                    match_id: m.id,
                    pool_name: m.pool_name.clone(),
                });
            }
        }
    }
    warnings
}
