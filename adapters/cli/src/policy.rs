//! Intent sources that stand in for a human or an agent.

use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strata_core::ActionIntent;

/// Selectable intent policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum PolicyKind {
    /// Never presses anything.
    Idle,
    /// Uniformly random intent bits every tick.
    Random,
    /// Holds right, hops every half second and mines whatever is ahead.
    WalkRight,
}

/// Produces one intent per tick.
#[derive(Debug)]
pub(crate) enum Policy {
    Idle,
    Random(ChaCha8Rng),
    WalkRight,
}

impl Policy {
    pub(crate) fn new(kind: PolicyKind, seed: u32) -> Self {
        match kind {
            PolicyKind::Idle => Self::Idle,
            PolicyKind::Random => Self::Random(ChaCha8Rng::seed_from_u64(u64::from(seed))),
            PolicyKind::WalkRight => Self::WalkRight,
        }
    }

    pub(crate) fn intent(&mut self, tick: u64) -> ActionIntent {
        match self {
            Self::Idle => ActionIntent::IDLE,
            Self::Random(rng) => ActionIntent::from_bits(rng.gen_range(0..32)),
            Self::WalkRight => ActionIntent {
                move_right: true,
                jump: tick % 30 == 0,
                destroy: true,
                ..ActionIntent::IDLE
            },
        }
    }
}
