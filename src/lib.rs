//! Budgeted deviation testing for empirical attacker–defender games.
//!
//! Given an empirical equilibrium over a finite strategy pool, this crate
//! asks whether the player under test can profitably deviate, using a noisy
//! stochastic optimizer as a stand-in best-response oracle.
//!
//! # Module Structure
//!
//! - `budget`: false-negative tolerance split and per-step trial counts
//! - `game`: mixed strategies, normalized parameter vectors, payoff surfaces
//! - `oracle`: best-response and payoff-verification seams, retries, deadlines
//! - `anneal`: reference simulated-annealing oracle
//! - `arena`: per-step game data and idempotent step artifacts
//! - `search`: greedy first-improvement deviation search for one round
//! - `confirm`: early-stopped estimate of the deviation probability
//! - `record`: write-once, overwrite-protected run outputs
//! - `claim`: atomic per-round claims for parallel workers
//! - `experiment`: run configuration and the round scheduler

mod anneal;
mod arena;
mod budget;
mod claim;
mod confirm;
mod error;
mod experiment;
mod game;
mod oracle;
mod record;
mod search;

pub use anneal::*;
pub use arena::*;
pub use budget::*;
pub use claim::*;
pub use confirm::*;
pub use error::*;
pub use experiment::*;
pub use game::*;
pub use oracle::*;
pub use record::*;
pub use search::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Expected payoffs and Monte-Carlo payoff estimates.
pub type Utility = f64;
/// Mixture weights, error tolerances, and improvement probabilities.
pub type Probability = f64;

// ============================================================================
// GAME PARAMETERS
// ============================================================================
/// Dimension of a normalized deviating strategy in the reference game.
pub const DIMENSION: usize = 3;
/// Allowed drift of a mixed strategy's total mass away from 1.
pub const PROBABILITY_SUM_TOLERANCE: Probability = 0.001;
/// Threshold below which a decaying quantity is considered finished.
pub const DONE_TOLERANCE: Probability = 0.01;

// ============================================================================
// SEQUENTIAL CONFIRMATION
// Clopper–Pearson bound used to stop the deviation-probability estimate early.
// ============================================================================
/// Two-sided error level of the Clopper–Pearson interval (90% coverage).
/// Early stopping uses only its lower end, the `alpha / 2` quantile, which
/// on its own is a one-sided 95% lower bound.
pub const CLOPPER_PEARSON_ALPHA: Probability = 0.1;
/// Confirmation trials between progress log lines.
pub const CONFIRM_LOG_INTERVAL: usize = 25;
/// Rounds between outcome log lines.
pub const ROUND_LOG_INTERVAL: usize = 10;

// ============================================================================
// SIMULATED ANNEALING
// Reference oracle: T(k) = T₀ · (1 - k/budget), greedy once T < DONE_TOLERANCE.
// ============================================================================
/// Initial annealing temperature in payoff units.
pub const ANNEALING_TEMPERATURE: Utility = 1.0;

// ============================================================================
// COLLABORATOR RETRIES
// ============================================================================
/// Ceiling on a single retry backoff, regardless of attempt count.
pub const RETRY_BACKOFF_MAX: std::time::Duration = std::time::Duration::from_secs(30);

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() -> Result<(), Error> {
    std::fs::create_dir_all("logs")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time))?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file])?;
    Ok(())
}
