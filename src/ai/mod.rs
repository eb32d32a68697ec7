//! The computer opponent: position evaluation, best-move search, the
//! background runner that keeps search off the interactive loop, and agents.

mod agent;
pub mod heuristic;
mod random;
pub mod runner;
pub mod search;

pub use agent::{Agent, SearchAgent};
pub use heuristic::{Heuristic, LineHeuristic, LineScoring};
pub use random::RandomAgent;
pub use runner::{RunnerPhase, SearchRunner};
pub use search::{best_move, SearchResult, Searcher};
