//! Subset construction: converts an NFA start state into an equivalent
//! deterministic one, built on top of the compiled table rather than the
//! live graph.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::hash::Hash;

use crate::label::Label;
use crate::state::{Accept, State, StateId};

/// Runs subset construction from `start`, returning the start node of a
/// fresh, deterministic graph accepting the same language: no epsilon
/// transitions, and at most one successor per label.
///
/// Requires (and produces, if absent) a compiled table on `start`, per the
/// component design's "require/produce a compiled table" first step.
pub fn to_dfa<S: Clone + Eq + Hash>(start: &State<S>) -> State<S> {
    let table = start.compile();
    let alphabet: Vec<S> = table.alphabet().into_iter().collect();

    let s0: BTreeSet<StateId> = BTreeSet::from([table.start()]);

    let mut nodes: HashMap<BTreeSet<StateId>, State<S>> = HashMap::new();
    nodes.insert(s0.clone(), State::new());

    let mut queue = VecDeque::new();
    queue.push_back(s0.clone());

    // (source set, alphabet index) -> target set; resolved to real State
    // edges only once every reachable set has a placeholder node.
    let mut edges: HashMap<(BTreeSet<StateId>, usize), BTreeSet<StateId>> = HashMap::new();

    while let Some(set) = queue.pop_front() {
        for (idx, symbol) in alphabet.iter().enumerate() {
            let label = Label::Symbol(symbol.clone());
            let mut target: BTreeSet<StateId> = BTreeSet::new();
            for id in &set {
                if let Some(succ) = table.successors(&label, *id) {
                    target.extend(succ.iter().copied());
                }
            }
            if target.is_empty() {
                // Transitions whose target is the empty set are dropped.
                continue;
            }
            if let std::collections::hash_map::Entry::Vacant(e) = nodes.entry(target.clone()) {
                e.insert(State::new());
                queue.push_back(target.clone());
            }
            edges.insert((set.clone(), idx), target);
        }
    }

    for (set, node) in &nodes {
        let accepting = set.iter().any(|id| table.is_accepting(*id));
        node.set_accept(if accepting {
            Accept::ForceAccept
        } else {
            Accept::ForceReject
        });
    }

    for ((set, idx), target) in &edges {
        let from = nodes.get(set).expect("node created for every visited set");
        let to = nodes.get(target).expect("node created for every visited set");
        let label = Label::Symbol(alphabet[*idx].clone());
        from.replace_transition(label, to.clone().into())
            .expect("a single successor state is never an empty list");
    }

    nodes
        .get(&s0)
        .expect("the initial set is always visited")
        .clone()
}
