//! Test plan: which targets are cycled, how often, and with which commands
//!
//! A plan is derived from a [`PlanProfile`] and is immutable once handed to
//! the driver. Two profiles exist:
//!
//! | Profile | Targets | Verify phase | `run` on final cycle | Resets |
//! |---------|---------|--------------|----------------------|--------|
//! | KvStore | Internal, TDB-External, File-System | yes | no | 6 |
//! | StorageLite | single placeholder target | no | yes | 10 |

use crate::error::PlanError;
use crate::types::{BackendType, Command, CommandArg, VALUE_PLACEHOLDER};
use std::fmt;

/// Reset cycles per backend for the KV store profile.
pub const RESET_COUNT: u32 = 6;

/// Reset cycles for the StorageLite profile.
pub const STORAGELITE_RESET_COUNT: u32 = 10;

/// Minimum pause between `run` and the forced reset, in seconds.
pub const RESET_DELAY_BASE_SECS: f64 = 4.0;

/// Upper bound of the random extra pause before a reset, in seconds.
pub const RESET_DELAY_JITTER_SECS: f64 = 2.0;

/// Choreography variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanProfile {
    /// Every KV store backend, with a verify phase after each init
    #[default]
    KvStore,
    /// Single StorageLite target, writes on every cycle, no verify phase
    StorageLite,
}

impl PlanProfile {
    /// Name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            PlanProfile::KvStore => "kvstore",
            PlanProfile::StorageLite => "storagelite",
        }
    }

    /// Parse a configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "kvstore" => Some(PlanProfile::KvStore),
            "storagelite" => Some(PlanProfile::StorageLite),
            _ => None,
        }
    }

    /// Default number of reset cycles per target.
    pub fn default_reset_count(&self) -> u32 {
        match self {
            PlanProfile::KvStore => RESET_COUNT,
            PlanProfile::StorageLite => STORAGELITE_RESET_COUNT,
        }
    }
}

impl fmt::Display for PlanProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One formatted-then-cycled unit of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanTarget {
    /// A KV store backend, named in `format`/`init`
    Backend(BackendType),
    /// A target the device identifies on its own; commands carry `"0"`
    Placeholder,
}

impl PlanTarget {
    /// Argument sent with `format` and `init` for this target.
    pub fn argument(&self) -> CommandArg {
        match self {
            PlanTarget::Backend(backend) => CommandArg::from(*backend),
            PlanTarget::Placeholder => CommandArg::text(VALUE_PLACEHOLDER),
        }
    }
}

impl fmt::Display for PlanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanTarget::Backend(backend) => write!(f, "{}", backend),
            PlanTarget::Placeholder => f.write_str("placeholder"),
        }
    }
}

/// Ordered targets times reset cycles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPlan {
    profile: PlanProfile,
    targets: Vec<PlanTarget>,
    reset_count: u32,
}

impl Default for TestPlan {
    fn default() -> Self {
        TestPlan::new(PlanProfile::default())
    }
}

impl TestPlan {
    /// Plan with the profile's default targets and reset count.
    pub fn new(profile: PlanProfile) -> Self {
        let targets = match profile {
            PlanProfile::KvStore => BackendType::ALL
                .into_iter()
                .map(PlanTarget::Backend)
                .collect(),
            PlanProfile::StorageLite => vec![PlanTarget::Placeholder],
        };
        TestPlan {
            profile,
            targets,
            reset_count: profile.default_reset_count(),
        }
    }

    /// The KV store resilience plan: 3 backends x 6 resets.
    pub fn kvstore() -> Self {
        TestPlan::new(PlanProfile::KvStore)
    }

    /// The StorageLite reset plan: 1 target x 10 resets.
    pub fn storagelite() -> Self {
        TestPlan::new(PlanProfile::StorageLite)
    }

    /// Override the number of reset cycles per target (builder pattern).
    pub fn with_reset_count(mut self, reset_count: u32) -> Self {
        self.reset_count = reset_count;
        self
    }

    /// Restrict or reorder the backends under test.
    ///
    /// Only the KV store profile names its backends.
    pub fn with_backends(mut self, backends: &[BackendType]) -> Result<Self, PlanError> {
        if self.profile != PlanProfile::KvStore {
            return Err(PlanError::BackendsNotSupported(self.profile.name()));
        }
        self.targets = backends.iter().copied().map(PlanTarget::Backend).collect();
        Ok(self)
    }

    /// Validate the plan.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.reset_count == 0 {
            return Err(PlanError::ZeroResetCount);
        }
        if self.targets.is_empty() {
            return Err(PlanError::NoTargets);
        }
        Ok(())
    }

    /// Profile this plan was built from.
    pub fn profile(&self) -> PlanProfile {
        self.profile
    }

    /// Targets in the order they are exercised.
    pub fn targets(&self) -> &[PlanTarget] {
        &self.targets
    }

    /// Target at `index`, if any.
    pub fn target(&self, index: usize) -> Option<PlanTarget> {
        self.targets.get(index).copied()
    }

    /// Reset cycles per target.
    pub fn reset_count(&self) -> u32 {
        self.reset_count
    }

    /// Total number of resets over the whole plan.
    pub fn total_resets(&self) -> u64 {
        self.targets.len() as u64 * u64::from(self.reset_count)
    }

    /// Whether a `verify` command follows every `init_done`.
    pub fn has_verify_phase(&self) -> bool {
        matches!(self.profile, PlanProfile::KvStore)
    }

    /// Whether cycle `cycle` issues `run` (and the randomized delay) before
    /// its reset.
    pub fn writes_on_cycle(&self, cycle: u32) -> bool {
        match self.profile {
            PlanProfile::KvStore => cycle + 1 < self.reset_count,
            PlanProfile::StorageLite => true,
        }
    }

    /// `format` command for a target.
    pub fn format_command(&self, target: PlanTarget) -> Command {
        Command::format(target.argument())
    }

    /// `init` command for a target.
    pub fn init_command(&self, target: PlanTarget) -> Command {
        Command::init(target.argument())
    }

    /// `verify` command for a cycle.
    pub fn verify_command(&self, cycle: u32) -> Command {
        Command::verify(cycle)
    }

    /// `run` command issued during `cycle`.
    ///
    /// KV store writes are tagged with the next cycle index so the following
    /// `verify` can find them.
    pub fn run_command(&self, cycle: u32) -> Command {
        match self.profile {
            PlanProfile::KvStore => Command::run(cycle + 1),
            PlanProfile::StorageLite => Command::run(VALUE_PLACEHOLDER),
        }
    }
}
