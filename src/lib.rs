//!# epsilon_nfa
//!
//! `epsilon_nfa` is a library for constructing, matching, compiling and
//! determinizing nondeterministic finite automata (NFAs) over an arbitrary
//! symbol type — not just strings.
//!
//! ## Usage
//!
//! ```rust
//! use epsilon_nfa::label::Label;
//! use epsilon_nfa::state::{State, Successors};
//!
//! // A -a-> B -b-> C -c-> D, with D accepting by default (no outgoing
//! // transitions of its own).
//! let d = State::new();
//! let c = State::try_from_transitions([(Label::Symbol('c'), Successors::from(d))]).unwrap();
//! let b = State::try_from_transitions([(Label::Symbol('b'), Successors::from(c))]).unwrap();
//! let a = State::try_from_transitions([(Label::Symbol('a'), Successors::from(b))]).unwrap();
//!
//! assert_eq!(a.is_match("abc".chars(), true), Some(3));
//! assert_eq!(a.is_match("ab".chars(), true), None);
//! assert_eq!(a.is_match("abcx".chars(), false), Some(3));
//!
//! // Compiling caches a flat table and switches matching to the iterative
//! // back-end; determinizing produces an equivalent automaton with no
//! // epsilon transitions and at most one successor per label.
//! a.compile();
//! let dfa = a.to_dfa();
//! assert_eq!(dfa.is_match("abc".chars(), true), Some(3));
//! ```
//!
//! ## Model
//!
//! A state owns a mapping from [`label::Label`] (epsilon, or a user symbol)
//! to a non-empty ordered list of successor states. States are identified by
//! handle identity, not by the value of their contents, so two states built
//! from identical transitions remain distinct — this is what lets the graph
//! contain cycles and shared successors safely. Acceptance follows a default
//! rule (accepting iff a state has no outgoing transitions) unless overridden
//! by [`state::State::force_accept`], [`state::State::force_reject`] or
//! [`state::State::invert`], each of which produces a shallow copy rather
//! than mutating the original.
//!
//! ## Operations
//!
//! This library currently supports:
//!
//! * Incremental construction of a state graph, including self-cycles and
//!   shared successors ([`state::State::try_from_transitions`],
//!   [`state::State::insert_transition`])
//! * [Epsilon closure](state::State::closure) and [e-L-e neighborhoods](state::State::neighbors)
//! * [Longest-match matching](state::State::is_match) in full and prefix modes
//! * [Compiling](state::State::compile) a closure-aware flat transition table
//! * [Converting an NFA to an equivalent DFA](state::State::to_dfa) via subset construction
//! * [Topology-preserving deep copy](state::State::copy)

pub mod compiled;
pub mod determinize;
pub mod error;
pub mod eval;
pub mod input;
pub mod label;
pub mod state;
