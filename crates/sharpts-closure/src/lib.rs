//! Closure capture analysis and display-class planning.

mod analyzer;
mod builtins;
mod capture_map;
mod display_class;

pub use analyzer::ClosureAnalyzer;
pub use capture_map::CaptureMap;
pub use display_class::{DisplayClass, DisplayClassSynthesizer, Slot};

/// Build the `DisplayClass` layout for every scope with at least one
/// capture, from the `CaptureMap` `ClosureAnalyzer::analyze` produced.
pub fn synthesize_display_classes(captures: &CaptureMap) -> DisplayClassSynthesizer {
    let mut synth = DisplayClassSynthesizer::new();
    let mut owned: Vec<_> = captures.captured_owned_vars().collect();
    owned.sort_by_key(|(owner, var)| (owner.0, var.0));
    for (owner, var) in owned {
        synth.capture(owner, var);
    }
    let mut hoisted: Vec<_> = captures.this_hoisted_owners().collect();
    hoisted.sort_by_key(|f| f.0);
    for owner in hoisted {
        synth.mark_this_captured(owner);
    }
    synth
}
