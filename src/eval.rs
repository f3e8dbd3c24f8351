//! The lazy back-end: recursive-descent graph walk with backtracking.
//!
//! No table is built; each step recomputes the epsilon closure of whatever
//! states are reachable so far. This is the fallback used whenever a state
//! has no compiled table cached (see [`crate::state::State::compile`]).

use crate::input::MatchInput;
use crate::label::Label;
use crate::state::State;

/// Runs the lazy matcher from `start` over `input`, per the full/prefix
/// semantics shared with the compiled back-end.
pub fn run<S: Clone + PartialEq>(start: &State<S>, input: &MatchInput<S>, full: bool) -> Option<usize> {
    best(start, input, 0, full)
}

/// The best (longest) total match length achievable by continuing from
/// `state` having already consumed `pos` symbols of `input`.
///
/// Backtracking safety falls out for free here: every sibling recursive call
/// receives the same `input`/`pos` pair by value, so no branch can observe a
/// different view of the suffix than any other.
fn best<S: Clone + PartialEq>(
    state: &State<S>,
    input: &MatchInput<S>,
    pos: usize,
    full: bool,
) -> Option<usize> {
    let closure = state.closure();
    let here_accepts = closure.iter().any(State::accepting);

    let mut candidates = Vec::new();
    if !full && here_accepts {
        candidates.push(pos);
    }

    if pos == input.len() {
        return if full {
            here_accepts.then_some(pos)
        } else {
            candidates.into_iter().max()
        };
    }

    let symbol = input.get(pos).expect("pos < input.len() checked above").clone();
    let label = Label::Symbol(symbol);
    for u in &closure {
        for successor in u.step(&label) {
            if let Some(len) = best(&successor, input, pos + 1, full) {
                candidates.push(len);
            }
        }
    }
    candidates.into_iter().max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Successors;

    fn chain() -> State<char> {
        let d = State::new();
        let c = State::try_from_transitions([(Label::Symbol('c'), Successors::from(d.clone()))]).unwrap();
        let b = State::try_from_transitions([(Label::Symbol('b'), Successors::from(c))]).unwrap();
        State::try_from_transitions([(Label::Symbol('a'), Successors::from(b))]).unwrap()
    }

    #[test]
    fn linear_chain_full_and_prefix() {
        let a = chain();
        assert_eq!(run(&a, &MatchInput::from("abc".chars()), true), Some(3));
        assert_eq!(run(&a, &MatchInput::from("ab".chars()), true), None);
        assert_eq!(run(&a, &MatchInput::from("abcx".chars()), false), Some(3));
    }

    #[test]
    fn kleene_like_cycle() {
        let x = State::new();
        let a = State::new();
        a.insert_transition(Label::Symbol('c'), Successors::from(x)).unwrap();
        a.insert_transition(Label::Symbol('b'), Successors::from(a.clone())).unwrap();
        assert_eq!(run(&a, &MatchInput::from("bbbbc".chars()), true), Some(5));
        assert_eq!(run(&a, &MatchInput::from("bbbb".chars()), true), None);
    }

    #[test]
    fn prefix_longest_match_with_cycle() {
        let accept = State::new();
        let z = State::new();
        z.insert_transition(
            Label::Symbol(0u8),
            Successors::from(vec![accept, z.clone()]),
        )
        .unwrap();
        assert_eq!(run(&z, &MatchInput::from([0u8, 0, 0, 0]), false), Some(4));
    }

    #[test]
    fn epsilon_as_skip() {
        let t = State::new();
        let y = State::try_from_transitions([(Label::Symbol(2u8), Successors::from(t.clone()))]).unwrap();
        let z = State::try_from_transitions([(Label::Symbol(3u8), Successors::from(t))]).unwrap();
        let s = State::try_from_transitions([(Label::Epsilon, Successors::from(vec![y, z]))]).unwrap();
        assert_eq!(run(&s, &MatchInput::from([2u8]), true), Some(1));
        assert_eq!(run(&s, &MatchInput::from([3u8]), true), Some(1));
    }

    #[test]
    fn force_accept_mid_chain() {
        let c = State::new();
        let b = State::try_from_transitions([(Label::Symbol('y'), Successors::from(c))]).unwrap();
        let forced = b.force_accept();
        let a = State::try_from_transitions([(Label::Symbol('x'), Successors::from(forced))]).unwrap();
        assert_eq!(run(&a, &MatchInput::from("x".chars()), true), Some(1));

        let a2 = State::try_from_transitions([(Label::Symbol('x'), Successors::from(b))]).unwrap();
        assert_eq!(run(&a2, &MatchInput::from("x".chars()), true), None);
    }

    #[test]
    fn empty_input_boundaries() {
        let accepting = State::new();
        assert_eq!(run(&accepting, &MatchInput::from("".chars()), true), Some(0));

        let rejecting = accepting.force_reject();
        assert_eq!(run(&rejecting, &MatchInput::from("".chars()), true), None);
    }
}
