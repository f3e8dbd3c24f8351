use thiserror::Error;

/// The three caller-fault error kinds a state graph or matcher can raise.
///
/// All are synchronous and surfaced at the call site; none are retried or
/// swallowed internally. A non-match is never an error — see [`crate::state::State::is_match`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NfaError {
    /// A construction argument could not be consumed as a finite collection
    /// of `(label, successors)` pairs.
    #[error("construction argument is not a finite collection of transitions")]
    InvalidArgument,
    /// A transition's successors were neither a single state nor a non-empty
    /// list of states.
    #[error("transition successors must be a state or a non-empty list of states")]
    InvalidValue,
    /// Match input was not a finite sequence, or contained the epsilon marker.
    #[error("match input is not a finite sequence, or contains the epsilon marker")]
    InvalidInput,
}
