use crate::block::{create_block_from_parent, BlockConstructor};
use crate::scoring::{higher_slot_scoring, ForkChoiceScoring};
use crate::transition::{state_transition, StateTransition};
use chain::{ChainConfig, SERENITY_CONFIG, XIAO_LONG_BAO_CONFIG};
use committees::initialize_shuffling_seeds;
use containers::{BeaconState, Block, BlockBody, Bytes32, SignedBlock, Slot};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ForkName {
    Serenity,
    XiaoLongBao,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown fork {0:?}")]
pub struct UnknownFork(pub String);

impl ForkName {
    pub const ALL: [ForkName; 2] = [ForkName::Serenity, ForkName::XiaoLongBao];

    pub fn as_str(self) -> &'static str {
        match self {
            ForkName::Serenity => "serenity",
            ForkName::XiaoLongBao => "xiao_long_bao",
        }
    }

    pub fn bundle(self) -> &'static ForkBundle {
        match self {
            ForkName::Serenity => &SERENITY,
            ForkName::XiaoLongBao => &XIAO_LONG_BAO,
        }
    }
}

impl fmt::Display for ForkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForkName {
    type Err = UnknownFork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|fork| fork.as_str() == s)
            .ok_or_else(|| UnknownFork(s.to_owned()))
    }
}

/// Everything that varies between forks, fixed when a chain is built.
pub struct ForkBundle {
    pub name: ForkName,
    pub config: ChainConfig,
    pub create_block_from_parent: BlockConstructor,
    pub state_transition: StateTransition,
    pub fork_choice_scoring: ForkChoiceScoring,
}

impl fmt::Debug for ForkBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForkBundle")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

static SERENITY: ForkBundle = ForkBundle {
    name: ForkName::Serenity,
    config: SERENITY_CONFIG,
    create_block_from_parent,
    state_transition,
    fork_choice_scoring: higher_slot_scoring,
};

static XIAO_LONG_BAO: ForkBundle = ForkBundle {
    name: ForkName::XiaoLongBao,
    config: XIAO_LONG_BAO_CONFIG,
    create_block_from_parent,
    state_transition,
    fork_choice_scoring: higher_slot_scoring,
};

impl ForkBundle {
    /// Genesis state with `validator_count` active validators and its block.
    ///
    /// The state's latest block root already points at the returned block,
    /// so the first child can be applied directly.
    pub fn genesis(
        &self,
        validator_count: usize,
    ) -> Result<(BeaconState, SignedBlock), committees::Error> {
        let mut state = BeaconState::genesis(&self.config, validator_count);
        initialize_shuffling_seeds(&mut state, &self.config)?;

        let block = SignedBlock::new(
            Block {
                slot: Slot(self.config.genesis_slot),
                parent_root: Bytes32::zero(),
                state_root: state.state_root(),
                body: BlockBody::default(),
            },
            Vec::new(),
        );
        state.latest_block_root = block.root();

        Ok((state, block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ForkName::Serenity)]
    #[case(ForkName::XiaoLongBao)]
    fn test_name_round_trips_through_str(#[case] fork: ForkName) {
        assert_eq!(fork.to_string().parse::<ForkName>(), Ok(fork));
        assert_eq!(fork.bundle().name, fork);
        assert!(fork.bundle().config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fork() {
        assert_eq!(
            "frontier".parse::<ForkName>(),
            Err(UnknownFork("frontier".to_owned()))
        );
    }

    #[test]
    fn test_genesis_block_matches_state() {
        let bundle = ForkName::XiaoLongBao.bundle();
        let (state, block) = bundle.genesis(16).expect("genesis");

        assert_eq!(block.slot(), state.slot);
        assert!(block.parent_root().is_zero());
        assert_eq!(state.latest_block_root, block.root());
        assert!(!state.current_shuffling_seed.is_zero());
    }
}
