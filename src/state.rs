use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use crate::compiled::CompiledTable;
use crate::error::NfaError;
use crate::input::MatchInput;
use crate::label::Label;
use crate::{compiled, eval};

/// An accept override on a state, applied on top of the default acceptance rule.
///
/// `Unset` defers to the default rule (accepting iff there are no outgoing
/// transitions); `ForceAccept`/`ForceReject` pin the answer regardless of
/// outgoing transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accept {
    #[default]
    Unset,
    ForceAccept,
    ForceReject,
}

/// The successors of a single transition entry: either one state, or a
/// non-empty list of states. This is the normalized form every public
/// constructor funnels into.
#[derive(Debug, Clone)]
pub enum Successors<S> {
    One(State<S>),
    Many(Vec<State<S>>),
}

impl<S> Successors<S> {
    fn into_vec(self) -> Vec<State<S>> {
        match self {
            Successors::One(s) => vec![s],
            Successors::Many(v) => v,
        }
    }
}

impl<S> From<State<S>> for Successors<S> {
    fn from(value: State<S>) -> Self {
        Successors::One(value)
    }
}

impl<S> From<Vec<State<S>>> for Successors<S> {
    fn from(value: Vec<State<S>>) -> Self {
        Successors::Many(value)
    }
}

impl<S, const N: usize> From<[State<S>; N]> for Successors<S> {
    fn from(value: [State<S>; N]) -> Self {
        Successors::Many(value.into())
    }
}

struct Inner<S> {
    transitions: Vec<(Label<S>, Vec<State<S>>)>,
    accept: Accept,
    compiled: Option<Rc<CompiledTable<S>>>,
}

/// A node in an automaton's state graph.
///
/// A `State` is a cheap-to-clone handle (`Rc<RefCell<_>>`); cloning a handle
/// does not duplicate the underlying node, it shares it — exactly the
/// "identity, not value equality, distinguishes states" invariant, since two
/// independently constructed states with identical transitions are still
/// distinct by pointer. Use [`State::copy`] for an actual topology-preserving
/// duplicate.
///
/// `Rc<RefCell<_>>` is neither `Send` nor `Sync`: sharing a state across
/// threads without external synchronization is a compile error, not merely
/// a documented hazard.
pub struct State<S>(pub(crate) Rc<RefCell<Inner<S>>>);

impl<S> Clone for State<S> {
    fn clone(&self) -> Self {
        State(Rc::clone(&self.0))
    }
}

impl<S> PartialEq for State<S> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl<S> Eq for State<S> {}

impl<S> State<S> {
    /// An opaque, stable identity for this state, usable as a hash map key.
    /// Backed by the handle's heap address.
    pub fn id(&self) -> StateId {
        StateId(Rc::as_ptr(&self.0) as usize)
    }

    /// An empty, default-accepting state (no transitions, accept unset).
    pub fn new() -> Self {
        State(Rc::new(RefCell::new(Inner {
            transitions: Vec::new(),
            accept: Accept::Unset,
            compiled: None,
        })))
    }
}

impl<S> Default for State<S> {
    fn default() -> Self {
        State::new()
    }
}

const MAX_DYNAMIC_TRANSITIONS: usize = 1 << 20;

impl<S: Clone + PartialEq> State<S> {
    /// Builds a state from a finite collection of `(label, successors)`
    /// pairs (a `Vec`, an array, a `HashMap`, ...). Ordinary Rust collections
    /// are statically known to be finite, which is why `NfaError::InvalidArgument`
    /// never fires on this path; it remains reachable from
    /// [`State::try_from_dyn_transitions`] for sources that can't make that
    /// guarantee.
    pub fn try_from_transitions<I>(transitions: I) -> Result<Self, NfaError>
    where
        I: IntoIterator<Item = (Label<S>, Successors<S>)>,
    {
        let state = State::new();
        for (label, successors) in transitions {
            state.insert_transition(label, successors)?;
        }
        Ok(state)
    }

    /// Builds a state from a boxed iterator that cannot statically prove
    /// finiteness (for example, the result of chaining `.filter()`/`.map()`
    /// combinators over a caller-supplied source). Consumption is capped;
    /// exceeding the cap is treated as a non-finite argument.
    pub fn try_from_dyn_transitions(
        transitions: &mut dyn Iterator<Item = (Label<S>, Successors<S>)>,
    ) -> Result<Self, NfaError> {
        let state = State::new();
        for (i, (label, successors)) in transitions.enumerate() {
            if i >= MAX_DYNAMIC_TRANSITIONS {
                return Err(NfaError::InvalidArgument);
            }
            state.insert_transition(label, successors)?;
        }
        Ok(state)
    }

    /// Adds a transition entry. If `label` is already present, `successors`
    /// are appended to the existing list rather than replacing it — multiple
    /// `insert_transition` calls for the same label are how nondeterministic
    /// fan-out under one label is built up.
    pub fn insert_transition(&self, label: Label<S>, successors: Successors<S>) -> Result<(), NfaError> {
        let successors = successors.into_vec();
        if successors.is_empty() {
            return Err(NfaError::InvalidValue);
        }
        let mut inner = self.0.borrow_mut();
        inner.compiled = None;
        match inner.transitions.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => existing.extend(successors),
            None => inner.transitions.push((label, successors)),
        }
        Ok(())
    }

    /// Replaces the successor list for `label` wholesale, inserting it if
    /// absent.
    pub fn replace_transition(&self, label: Label<S>, successors: Successors<S>) -> Result<(), NfaError> {
        let successors = successors.into_vec();
        if successors.is_empty() {
            return Err(NfaError::InvalidValue);
        }
        let mut inner = self.0.borrow_mut();
        inner.compiled = None;
        match inner.transitions.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => *existing = successors,
            None => inner.transitions.push((label, successors)),
        }
        Ok(())
    }

    /// Removes the transition entry for `label`, if any.
    pub fn remove_transition(&self, label: &Label<S>) {
        let mut inner = self.0.borrow_mut();
        inner.compiled = None;
        inner.transitions.retain(|(l, _)| l != label);
    }

    /// The non-epsilon labels on this state's own outgoing transitions
    /// (not including successors' labels).
    pub(crate) fn non_epsilon_labels(&self) -> Vec<Label<S>> {
        self.0
            .borrow()
            .transitions
            .iter()
            .filter(|(l, _)| !l.is_epsilon())
            .map(|(l, _)| l.clone())
            .collect()
    }

    /// The ordered list of direct successors for `label` (empty if absent).
    pub fn step(&self, label: &Label<S>) -> Vec<State<S>> {
        self.0
            .borrow()
            .transitions
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, succ)| succ.clone())
            .unwrap_or_default()
    }

    /// Whether this state is currently accepting under the default rule or
    /// its override.
    pub fn accepting(&self) -> bool {
        let inner = self.0.borrow();
        match inner.accept {
            Accept::ForceAccept => true,
            Accept::ForceReject => false,
            Accept::Unset => inner.transitions.is_empty(),
        }
    }

    /// Sets the accept override in place, without producing a copy.
    ///
    /// Not exposed publicly: the public accept mutators (`force_accept`,
    /// `force_reject`, `invert`) always act on an already-finished state by
    /// producing a shallow copy, which works for a single node but not for a
    /// batch of mutually-referencing placeholder nodes under construction
    /// (as in subset construction, where every produced DFA state may
    /// transition to any other). The determinizer builds each placeholder's
    /// transitions and identity first, wiring cycles directly, then assigns
    /// the accept flag in place as the last step — copying at that point
    /// would leave the cross-references pointing at the un-flagged
    /// originals.
    pub(crate) fn set_accept(&self, accept: Accept) {
        self.0.borrow_mut().accept = accept;
    }

    fn shallow_copy_with(&self, accept: Accept) -> Self {
        let inner = self.0.borrow();
        State(Rc::new(RefCell::new(Inner {
            transitions: inner.transitions.clone(),
            accept,
            compiled: None,
        })))
    }

    /// A shallow copy (successors shared, not duplicated) with the accept
    /// override forced to accept.
    pub fn force_accept(&self) -> Self {
        self.shallow_copy_with(Accept::ForceAccept)
    }

    /// A shallow copy with the accept override forced to reject.
    pub fn force_reject(&self) -> Self {
        self.shallow_copy_with(Accept::ForceReject)
    }

    /// A shallow copy with acceptance flipped relative to the current rule.
    pub fn invert(&self) -> Self {
        let accept = if self.accepting() {
            Accept::ForceReject
        } else {
            Accept::ForceAccept
        };
        self.shallow_copy_with(accept)
    }

    /// The epsilon closure of this state: every state reachable by zero or
    /// more epsilon transitions, discovered breadth-first, start first, ties
    /// broken by insertion order of each state's transition list, and
    /// deduplicated by identity.
    pub fn closure(&self) -> Vec<State<S>> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue = std::collections::VecDeque::new();
        seen.insert(self.id());
        order.push(self.clone());
        queue.push_back(self.clone());
        while let Some(current) = queue.pop_front() {
            for next in current.step(&Label::Epsilon) {
                if seen.insert(next.id()) {
                    order.push(next.clone());
                    queue.push_back(next);
                }
            }
        }
        order
    }

    /// `neighbors(label)`: epsilon-close, consume one `label`, epsilon-close
    /// again (the standard e-L-e composition).
    pub fn neighbors(&self, label: &Label<S>) -> Vec<State<S>> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        for u in self.closure() {
            for v in u.step(label) {
                for t in v.closure() {
                    if seen.insert(t.id()) {
                        order.push(t);
                    }
                }
            }
        }
        order
    }

    /// Every state reachable from this one by any label, including epsilon.
    pub fn reachable_states(&self) -> Vec<State<S>> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue = std::collections::VecDeque::new();
        seen.insert(self.id());
        order.push(self.clone());
        queue.push_back(self.clone());
        while let Some(current) = queue.pop_front() {
            let successors: Vec<State<S>> = current
                .0
                .borrow()
                .transitions
                .iter()
                .flat_map(|(_, succ)| succ.iter().cloned())
                .collect();
            for next in successors {
                if seen.insert(next.id()) {
                    order.push(next.clone());
                    queue.push_back(next);
                }
            }
        }
        order
    }

    /// Deep copy: duplicates every reachable state while preserving sharing
    /// and cycles. The accept override is preserved; a compiled table is not
    /// carried over onto the copy.
    pub fn copy(&self) -> Self {
        let mut seen: std::collections::HashMap<StateId, State<S>> = std::collections::HashMap::new();
        self.copy_rec(&mut seen)
    }

    fn copy_rec(&self, seen: &mut std::collections::HashMap<StateId, State<S>>) -> Self {
        if let Some(existing) = seen.get(&self.id()) {
            return existing.clone();
        }
        let accept = self.0.borrow().accept;
        let fresh = State(Rc::new(RefCell::new(Inner {
            transitions: Vec::new(),
            accept,
            compiled: None,
        })));
        seen.insert(self.id(), fresh.clone());
        let entries: Vec<(Label<S>, Vec<State<S>>)> = self.0.borrow().transitions.clone();
        let copied: Vec<(Label<S>, Vec<State<S>>)> = entries
            .into_iter()
            .map(|(label, succ)| {
                let succ = succ.into_iter().map(|s| s.copy_rec(seen)).collect();
                (label, succ)
            })
            .collect();
        fresh.0.borrow_mut().transitions = copied;
        fresh
    }

    /// Matches `input` against this state as the start. `full` selects exact
    /// vs. longest-prefix semantics. Dispatches to the compiled back-end if
    /// a table is cached on this state, otherwise to the lazy back-end.
    pub fn is_match(&self, input: impl Into<MatchInput<S>>, full: bool) -> Option<usize>
    where
        S: Eq + Hash,
    {
        let input = input.into();
        match self.0.borrow().compiled.clone() {
            Some(table) => compiled::run(&table, &input, full),
            None => eval::run(self, &input, full),
        }
    }
}

impl<S: Clone + Eq + Hash> State<S> {
    /// Compiles a flat transition table rooted at this state, caching it on
    /// self. Idempotent: calling again while the graph is unchanged returns
    /// the cached table without recomputation. Structural mutations clear
    /// the cache (see [`State::insert_transition`] and friends), so the
    /// "recompile after mutating" contract is partially automated here: we
    /// invalidate eagerly on mutation through this handle, but a table
    /// captured before an *alias* of this state was mutated through a
    /// different handle can still go stale, since the cache lives per-node,
    /// not per-graph.
    pub fn compile(&self) -> Rc<CompiledTable<S>> {
        if let Some(table) = self.0.borrow().compiled.clone() {
            return table;
        }
        let table = Rc::new(compiled::build(self));
        self.0.borrow_mut().compiled = Some(Rc::clone(&table));
        table
    }

    /// Converts this state into the start of an equivalent deterministic
    /// automaton via subset construction: no epsilon transitions, and at
    /// most one successor per label.
    pub fn to_dfa(&self) -> State<S> {
        crate::determinize::to_dfa(self)
    }

    /// The set of non-epsilon labels appearing anywhere in the reachable
    /// subgraph.
    pub fn symbols(&self) -> HashSet<S> {
        self.reachable_states()
            .into_iter()
            .flat_map(|s| {
                s.0.borrow()
                    .transitions
                    .iter()
                    .filter_map(|(l, _)| l.symbol().cloned())
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// An opaque, comparable, hashable state identity independent of `S`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl<S: fmt::Display> fmt::Display for State<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut seen = HashSet::new();
        self.fmt_rec(f, &mut seen)
    }
}

impl<S: fmt::Display> State<S> {
    fn fmt_rec(&self, f: &mut fmt::Formatter<'_>, seen: &mut HashSet<StateId>) -> fmt::Result {
        let inner = self.0.borrow();
        let prefix = match inner.accept {
            Accept::ForceAccept => "+",
            Accept::ForceReject => "-",
            Accept::Unset => "",
        };
        if !seen.insert(self.id()) {
            return write!(f, "{prefix}nfa({{...}})");
        }
        if inner.transitions.is_empty() {
            return write!(f, "{prefix}nfa()");
        }
        write!(f, "{prefix}nfa({{")?;
        for (i, (label, succ)) in inner.transitions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{label}: ")?;
            match succ.as_slice() {
                [one] => one.fmt_rec(f, seen)?,
                _ => {
                    write!(f, "[")?;
                    for (j, s) in succ.iter().enumerate() {
                        if j > 0 {
                            write!(f, ", ")?;
                        }
                        s.fmt_rec(f, seen)?;
                    }
                    write!(f, "]")?;
                }
            }
        }
        write!(f, "}})")
    }
}
