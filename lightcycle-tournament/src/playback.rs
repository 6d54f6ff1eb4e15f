//! Playback cursor over recorded rounds
//!
//! Pull-based: a viewer moves the cursor and asks for the current frame.
//! All moves clamp at the ends instead of failing.

use lightcycle_core::TurnSnapshot;

use crate::tournament::RoundRecord;

/// Position in a tournament's recorded history
#[derive(Clone, Copy, Debug)]
pub struct Playback<'a> {
    rounds: &'a [RoundRecord],
    round: usize,
    turn: usize,
}

impl<'a> Playback<'a> {
    pub fn new(rounds: &'a [RoundRecord]) -> Self {
        Self {
            rounds,
            round: 0,
            turn: 0,
        }
    }

    /// 0-based round index
    pub fn round(&self) -> usize {
        self.round
    }

    /// 0-based frame index within the round
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Frame under the cursor, `None` if nothing was recorded
    pub fn frame(&self) -> Option<&'a TurnSnapshot> {
        self.frames().get(self.turn)
    }

    pub fn frame_count(&self) -> usize {
        self.frames().len()
    }

    /// True on the last frame of the current round
    pub fn at_end(&self) -> bool {
        self.turn + 1 >= self.frame_count()
    }

    /// Jump to a round, clamped, starting at its first frame
    pub fn seek_round(&mut self, round: usize) {
        self.round = round.min(self.rounds.len().saturating_sub(1));
        self.turn = 0;
    }

    pub fn next_round(&mut self) {
        self.seek_round(self.round + 1);
    }

    pub fn prev_round(&mut self) {
        self.seek_round(self.round.saturating_sub(1));
    }

    pub fn first_turn(&mut self) {
        self.turn = 0;
    }

    pub fn last_turn(&mut self) {
        self.turn = self.frame_count().saturating_sub(1);
    }

    pub fn next_turn(&mut self) {
        self.turn = (self.turn + 1).min(self.frame_count().saturating_sub(1));
    }

    pub fn prev_turn(&mut self) {
        self.turn = self.turn.saturating_sub(1);
    }

    fn frames(&self) -> &'a [TurnSnapshot] {
        self.rounds
            .get(self.round)
            .map(|r| r.round().frames())
            .unwrap_or(&[])
    }
}
