pub mod base;
pub mod candidates;
pub mod greedy;
pub mod random;
pub mod retry;

pub use base::{DecisionProvider, ProviderError};
pub use greedy::{GreedyParams, GreedyPlayer};
pub use random::RandomPlayer;
pub use retry::{Rejection, Request, RetryPolicy};
