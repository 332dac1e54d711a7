//! Bot move policies.
//!
//! Policies are trait-based so the host can swap strategies:
//! - `RandomPolicy`: uniform among legal moves
//! - `GreedyPolicy`: finish > capture > leave home > advance the lead piece

use crate::core::{BotPolicyKind, Color, GameRng, GameState, PieceId};
use crate::rules::{LudoRules, RulesEngine};
use crate::track;

/// Picks one of the legal moves for a bot.
pub trait MovePolicy: Send + Sync {
    /// Choose a piece to move. `None` only when `moves` is empty.
    fn choose(
        &self,
        rules: &LudoRules,
        state: &GameState,
        color: Color,
        rng: &mut GameRng,
    ) -> Option<PieceId>;
}

/// Uniform among legal moves.
#[derive(Clone, Debug, Default)]
pub struct RandomPolicy;

impl MovePolicy for RandomPolicy {
    fn choose(
        &self,
        rules: &LudoRules,
        state: &GameState,
        color: Color,
        rng: &mut GameRng,
    ) -> Option<PieceId> {
        let moves = rules.legal_moves(state, color);
        rng.choose(&moves).copied()
    }
}

/// Heuristic policy.
///
/// Scores each legal move and takes the best; ties go to the lower piece id.
#[derive(Clone, Debug, Default)]
pub struct GreedyPolicy;

impl GreedyPolicy {
    const FINISH: i32 = 1000;
    const CAPTURE: i32 = 500;
    const LEAVE_HOME: i32 = 200;
    const SAFE_LANDING: i32 = 50;

    fn score(rules: &LudoRules, state: &GameState, color: Color, piece: PieceId) -> i32 {
        let Some(target) = rules.target(state, color, piece) else {
            return i32::MIN;
        };
        let from_home = state.piece(color, piece).map(|p| p.is_home()).unwrap_or(false);

        let mut score = track::progress(color, target).map(i32::from).unwrap_or(0);
        if target.is_finished() {
            score += Self::FINISH;
        }
        if rules.capture_victim(state, color, target).is_some() {
            score += Self::CAPTURE;
        }
        if from_home {
            score += Self::LEAVE_HOME;
        }
        if target
            .track_cell()
            .map(|cell| rules.config().is_safe(cell))
            .unwrap_or(true)
        {
            score += Self::SAFE_LANDING;
        }
        score
    }
}

impl MovePolicy for GreedyPolicy {
    fn choose(
        &self,
        rules: &LudoRules,
        state: &GameState,
        color: Color,
        _rng: &mut GameRng,
    ) -> Option<PieceId> {
        rules
            .legal_moves(state, color)
            .into_iter()
            .map(|piece| (Self::score(rules, state, color, piece), piece))
            .max_by(|(a, pa), (b, pb)| a.cmp(b).then(pb.cmp(pa)))
            .map(|(_, piece)| piece)
    }
}

/// Build the policy named by the configuration.
#[must_use]
pub fn policy_for(kind: BotPolicyKind) -> Box<dyn MovePolicy> {
    match kind {
        BotPolicyKind::Greedy => Box::new(GreedyPolicy),
        BotPolicyKind::Random => Box::new(RandomPolicy),
    }
}
