//! Compilation context configuration.
//!
//! Export slots and the virtual timer queue are isolated behind a single
//! explicitly-passed "compilation context" value with a documented
//! init/teardown phase, instead of global mutable state. `CompileOptions`
//! is the static half of that context (the parts fixed for the whole run);
//! the dynamic half (export slots, union cache) lives in the consuming
//! crates' own context types.

/// Target pointer width, relevant only to the `>>>` unsigned-right-shift
/// lowering's widen-through-unsigned-64-bit-then-to-double path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetWidth {
    Bits32,
    Bits64,
}

#[derive(Clone, Debug)]
pub struct CompileOptions {
    /// Whether the typed-stack boxing-elision optimisation is enabled.
    /// Disabling it is useful for differential testing against the
    /// canonical boxed-at-each-step reference execution semantics.
    pub boxing_elision: bool,
    pub target_width: TargetWidth,
    /// Id of the module whose top-level statements/`main` becomes the
    /// Linker's entry point.
    pub entry_module: u32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { boxing_elision: true, target_width: TargetWidth::Bits64, entry_module: 0 }
    }
}
