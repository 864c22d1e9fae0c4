//! Identity-alias capability consulted during classification.

/// Answers "do these two provisional designations denote the same object?".
///
/// The engine only queries it; implementations are never mutated during a
/// run. Backed in production by an alias-index file.
pub trait IdentityResolver {
    fn is_same(&self, label_a: &str, label_b: &str) -> bool;
}

/// Labels are the same object only when they are equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactLabel;

impl IdentityResolver for ExactLabel {
    fn is_same(&self, label_a: &str, label_b: &str) -> bool {
        label_a == label_b
    }
}

impl<F> IdentityResolver for F
where
    F: Fn(&str, &str) -> bool,
{
    fn is_same(&self, label_a: &str, label_b: &str) -> bool {
        self(label_a, label_b)
    }
}
