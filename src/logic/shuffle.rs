//! Roster shuffling. Independent of planning: callers shuffle, then regenerate.

use crate::models::Roster;
use rand::seq::SliceRandom;
use rand::Rng;

/// Uniformly random permutation of `names`.
pub fn shuffle_names<S, R>(names: &[S], rng: &mut R) -> Vec<String>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let mut shuffled: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
    shuffled.shuffle(rng);
    shuffled
}

/// Shuffle the whole roster (selected and unselected players) in place, with the given RNG.
/// Selection flags travel with their players.
pub fn shuffle_roster_with<R: Rng + ?Sized>(roster: &mut Roster, rng: &mut R) {
    roster.players.shuffle(rng);
    roster.touch();
}

/// Shuffle the whole roster with the thread RNG.
pub fn shuffle_roster(roster: &mut Roster) {
    shuffle_roster_with(roster, &mut rand::thread_rng());
}
