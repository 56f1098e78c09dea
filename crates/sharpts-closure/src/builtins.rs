//! Built-in global names excluded from capture analysis.

pub const BUILTIN_NAMES: &[&str] =
    &["console", "Math", "Symbol", "undefined", "NaN", "Infinity", "globalThis", "JSON", "Object", "Array"];

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}
