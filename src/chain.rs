//! Chain configuration: fork schedule and precompile sets
//!
//! The tracer needs exactly two things from chain configuration: which fork
//! rules are active for the block being traced, and which precompile
//! addresses those rules install. Both are resolved once at tx-start and
//! immutable afterwards.
//!
//! Fork identity is expressed as revm's [`SpecId`] so the rest of the crate
//! speaks the same hardfork vocabulary as the EVM ecosystem.

use alloy::primitives::{Address, B256, U256};
use once_cell::sync::Lazy;
use revm::primitives::hardfork::SpecId;

/// Execution-environment facts the host supplies at tx-start, sufficient to
/// resolve fork rules and the active precompile set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VMContext {
    pub block_number: U256,
    /// Block timestamp (unix seconds).
    pub time: u64,
    /// PREVRANDAO, present post-merge.
    pub random: Option<B256>,
    /// ArbOS version for Arbitrum-family chains; zero elsewhere.
    pub arbos_version: u64,
}

/// When a fork activates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForkCondition {
    Block(u64),
    Timestamp(u64),
}

impl ForkCondition {
    fn active_at(&self, block_number: u64, time: u64) -> bool {
        match self {
            Self::Block(b) => block_number >= *b,
            Self::Timestamp(t) => time >= *t,
        }
    }
}

/// A chain's fork schedule.
///
/// The schedule must be ordered oldest to newest; [`ChainConfig::rules`]
/// picks the newest activated entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: u64,
    schedule: Vec<(SpecId, ForkCondition)>,
}

impl ChainConfig {
    pub fn new(chain_id: u64, schedule: Vec<(SpecId, ForkCondition)>) -> Self {
        Self { chain_id, schedule }
    }

    /// Ethereum mainnet schedule.
    pub fn mainnet() -> Self {
        use ForkCondition::*;
        Self::new(
            1,
            vec![
                (SpecId::FRONTIER, Block(0)),
                (SpecId::HOMESTEAD, Block(1_150_000)),
                (SpecId::TANGERINE, Block(2_463_000)),
                (SpecId::SPURIOUS_DRAGON, Block(2_675_000)),
                (SpecId::BYZANTIUM, Block(4_370_000)),
                (SpecId::PETERSBURG, Block(7_280_000)),
                (SpecId::ISTANBUL, Block(9_069_000)),
                (SpecId::BERLIN, Block(12_244_000)),
                (SpecId::LONDON, Block(12_965_000)),
                (SpecId::MERGE, Block(15_537_394)),
                (SpecId::SHANGHAI, Timestamp(1_681_338_455)),
                (SpecId::CANCUN, Timestamp(1_710_338_135)),
                (SpecId::PRAGUE, Timestamp(1_746_612_311)),
            ],
        )
    }

    /// Resolves the fork rules active for a block.
    ///
    /// `has_random` forces at least [`SpecId::MERGE`]: a block carrying
    /// PREVRANDAO cannot be pre-merge regardless of the schedule.
    pub fn rules(
        &self,
        block_number: U256,
        has_random: bool,
        time: u64,
        _arbos_version: u64,
    ) -> SpecId {
        let block_number = block_number.saturating_to::<u64>();
        let mut spec = SpecId::FRONTIER;
        for (candidate, condition) in &self.schedule {
            if condition.active_at(block_number, time) {
                spec = *candidate;
            }
        }
        if has_random && !spec.is_enabled_in(SpecId::MERGE) {
            spec = SpecId::MERGE;
        }
        spec
    }

    /// The newest fork that is (or will be) active at `time`, ignoring block
    /// heights. Mirrors how hosts stamp traces with a fork label.
    pub fn latest_fork(&self, time: u64, _arbos_version: u64) -> SpecId {
        let mut spec = SpecId::FRONTIER;
        for (candidate, condition) in &self.schedule {
            let active = match condition {
                ForkCondition::Block(_) => true,
                ForkCondition::Timestamp(t) => time >= *t,
            };
            if active {
                spec = *candidate;
            }
        }
        spec
    }

    /// The precompile addresses installed under `spec`.
    pub fn active_precompiles(spec: SpecId) -> &'static [Address] {
        if spec.is_enabled_in(SpecId::PRAGUE) {
            &PRAGUE_PRECOMPILES
        } else if spec.is_enabled_in(SpecId::CANCUN) {
            &CANCUN_PRECOMPILES
        } else if spec.is_enabled_in(SpecId::ISTANBUL) {
            &ISTANBUL_PRECOMPILES
        } else if spec.is_enabled_in(SpecId::BYZANTIUM) {
            &BYZANTIUM_PRECOMPILES
        } else {
            &FRONTIER_PRECOMPILES
        }
    }
}

fn precompile_range(last: u8) -> Vec<Address> {
    (0x01..=last).map(Address::with_last_byte).collect()
}

// ecrecover, sha256, ripemd160, identity
static FRONTIER_PRECOMPILES: Lazy<Vec<Address>> = Lazy::new(|| precompile_range(0x04));
// + modexp, bn254 add/mul/pairing
static BYZANTIUM_PRECOMPILES: Lazy<Vec<Address>> = Lazy::new(|| precompile_range(0x08));
// + blake2f
static ISTANBUL_PRECOMPILES: Lazy<Vec<Address>> = Lazy::new(|| precompile_range(0x09));
// + kzg point evaluation
static CANCUN_PRECOMPILES: Lazy<Vec<Address>> = Lazy::new(|| precompile_range(0x0a));
// + bls12-381 operations
static PRAGUE_PRECOMPILES: Lazy<Vec<Address>> = Lazy::new(|| precompile_range(0x11));
