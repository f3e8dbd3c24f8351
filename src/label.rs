use std::fmt;

/// A transition label: either the distinguished epsilon marker or a user symbol.
///
/// Epsilon and a user symbol can never compare equal, since they are different
/// variants of the same sum type rather than two values of one type sharing a
/// sentinel. This is the static replacement for a dynamically-typed "singleton
/// epsilon object living in the same dict as symbol keys".
///
/// ```
/// use epsilon_nfa::label::Label;
///
/// let eps: Label<char> = Label::Epsilon;
/// let a = Label::Symbol('a');
/// assert_ne!(eps, a);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label<S> {
    /// The unlabeled transition; traversal does not consume an input symbol.
    Epsilon,
    /// A transition consuming exactly one symbol of type `S`.
    Symbol(S),
}

impl<S> Label<S> {
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    pub fn symbol(&self) -> Option<&S> {
        match self {
            Label::Epsilon => None,
            Label::Symbol(s) => Some(s),
        }
    }
}

impl<S: fmt::Display> fmt::Display for Label<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Epsilon => write!(f, "epsilon"),
            Label::Symbol(s) => write!(f, "{s}"),
        }
    }
}

impl<S> From<S> for Label<S> {
    fn from(value: S) -> Self {
        Label::Symbol(value)
    }
}
