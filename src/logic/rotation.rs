//! Rotation planning: split the game into periods and rotate players round-robin.

use crate::logic::clock::format_minutes;
use crate::models::{
    GameSettings, Half, PlanError, PlanOutput, PlaytimeEntry, RotationPeriod, RotationPlan,
};

/// Slack for floating noise when counting periods, so T / (T / N) never yields N + 1.
const PERIOD_COUNT_EPSILON: f64 = 1e-9;

/// Generate a substitution plan for the given active players (roster order, unique names).
///
/// 1. Fewer players than court spots: `InsufficientPlayers`.
/// 2. Exactly a full lineup: `NoRotationNeeded`, no periods.
/// 3. Otherwise: fair share = T × C / N, period length = share / C,
///    period count = ceil(T / length). Each period puts the C players from the
///    cursor onward (wrapping) on court, then the cursor advances by C.
///
/// Pure: the input is only read, and identical input gives an identical plan.
pub fn generate_plan<S: AsRef<str>>(
    active_players: &[S],
    settings: &GameSettings,
) -> Result<PlanOutput, PlanError> {
    let court = settings.court_capacity();
    let total_players = active_players.len();
    if total_players < court {
        return Err(PlanError::InsufficientPlayers {
            active: total_players,
            required: court,
        });
    }
    if total_players == court {
        log::debug!("{} players for {} spots, no rotation needed", total_players, court);
        return Ok(PlanOutput::NoRotationNeeded {
            players: total_players,
        });
    }

    let total_minutes = settings.total_minutes();
    let target_minutes = total_minutes * court as f64 / total_players as f64;
    let rotation_minutes = target_minutes / court as f64;
    let period_count = ((total_minutes / rotation_minutes) - PERIOD_COUNT_EPSILON).ceil() as usize;
    let halftime_index = (period_count + 1) / 2;

    let mut cursor = 0;
    let mut playtime = vec![0.0_f64; total_players];
    let mut periods = Vec::with_capacity(period_count);

    for i in 0..period_count {
        let start = i as f64 * rotation_minutes;
        let end = if i + 1 == period_count {
            total_minutes
        } else {
            ((i + 1) as f64 * rotation_minutes).min(total_minutes)
        };

        let mut on_court_mask = vec![false; total_players];
        let mut on_court = Vec::with_capacity(court);
        for j in 0..court {
            let idx = (cursor + j) % total_players;
            on_court_mask[idx] = true;
            on_court.push(active_players[idx].as_ref().to_string());
            playtime[idx] += end - start;
        }
        let bench = active_players
            .iter()
            .zip(&on_court_mask)
            .filter(|&(_, &on)| !on)
            .map(|(name, _)| name.as_ref().to_string())
            .collect();
        cursor = (cursor + court) % total_players;

        periods.push(RotationPeriod {
            index: i,
            half: if i < halftime_index { Half::First } else { Half::Second },
            start_minutes: start,
            end_minutes: end,
            start_label: format_minutes(start),
            end_label: format_minutes(end),
            on_court,
            bench,
        });
    }

    let total_playtime_minutes: f64 = playtime.iter().sum();
    let average_playtime_minutes = total_playtime_minutes / total_players as f64;
    log::debug!(
        "Planned {} periods of {:.2} min; total playtime {:.2} min, average {:.2} min",
        period_count,
        rotation_minutes,
        total_playtime_minutes,
        average_playtime_minutes
    );

    let playtime = active_players
        .iter()
        .zip(playtime)
        .map(|(name, minutes)| PlaytimeEntry {
            name: name.as_ref().to_string(),
            minutes,
            display: format_minutes(minutes),
        })
        .collect();

    Ok(PlanOutput::Rotation(RotationPlan {
        court_capacity: court,
        total_minutes,
        target_minutes,
        rotation_minutes,
        halftime_index,
        periods,
        playtime,
        total_playtime_minutes,
        average_playtime_minutes,
    }))
}
