//! `StackRepr` — the typed-stack value representation tracked at each
//! emission point so the emitter can elide boxing when both operands of an
//! operation are already known to be the same primitive shape.

/// The representation a value currently has on the typed stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackRepr {
    /// Boxed/polymorphic; could be anything, must go through the generic
    /// runtime path.
    Unknown,
    Double,
    Boolean,
    String,
    Null,
}

impl StackRepr {
    /// Whether a value in this representation needs boxing before it can be
    /// stored somewhere that expects `Unknown` (a display slot, an array
    /// element, a call argument to an unknown callee).
    pub const fn needs_boxing(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Whether two stack values already share a representation specific
    /// enough to apply an unboxed fast-path operator.
    pub fn both_unboxed(a: Self, b: Self) -> Option<Self> {
        (a == b && a != Self::Unknown).then_some(a)
    }
}
