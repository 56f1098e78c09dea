//! `RuntimeCatalog` — the symbolic table of named runtime entry points the
//! emitter calls. This crate carries no logic: it only says "an entry
//! named X exists with the following effect". It exists so
//! the emitter crates can refer to entry points by a checked `RuntimeEntry`
//! value instead of a bare string, catching typos at emission-construction
//! time without pretending to implement the runtime library itself.

/// Arity of a runtime entry point. `Variadic` covers entries like
/// `CreateArray`/`InvokeValue` that accept a packed argument array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Fixed(u8),
    Variadic,
}

/// One named runtime entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuntimeEntry {
    pub name: &'static str,
    pub arity: Arity,
}

macro_rules! catalog {
    ($($ident:ident => ($name:expr, $arity:expr)),* $(,)?) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        #[allow(non_camel_case_types)]
        pub enum RuntimeFn {
            $($ident),*
        }

        impl RuntimeFn {
            pub const fn entry(self) -> RuntimeEntry {
                match self {
                    $(Self::$ident => RuntimeEntry { name: $name, arity: $arity }),*
                }
            }

            pub const ALL: &'static [RuntimeFn] = &[$(Self::$ident),*];
        }
    };
}

catalog! {
    Add => ("Add", Arity::Fixed(2)),
    Equals => ("Equals", Arity::Fixed(2)),
    StrictEquals => ("StrictEquals", Arity::Fixed(2)),
    TypeOf => ("TypeOf", Arity::Fixed(1)),
    InstanceOf => ("InstanceOf", Arity::Fixed(2)),
    GetProperty => ("GetProperty", Arity::Fixed(2)),
    SetProperty => ("SetProperty", Arity::Fixed(3)),
    GetIndex => ("GetIndex", Arity::Fixed(2)),
    SetIndex => ("SetIndex", Arity::Fixed(3)),
    InvokeValue => ("InvokeValue", Arity::Variadic),
    CreateObject => ("CreateObject", Arity::Variadic),
    CreateArray => ("CreateArray", Arity::Variadic),
    Stringify => ("Stringify", Arity::Fixed(1)),
    PromiseThen => ("PromiseThen", Arity::Fixed(3)),
    PromiseCatch => ("PromiseCatch", Arity::Fixed(2)),
    PromiseFinally => ("PromiseFinally", Arity::Fixed(2)),
    PromiseAll => ("PromiseAll", Arity::Fixed(1)),
    PromiseAny => ("PromiseAny", Arity::Fixed(1)),
    PromiseRace => ("PromiseRace", Arity::Fixed(1)),
    PromiseAllSettled => ("PromiseAllSettled", Arity::Fixed(1)),
    PromiseResolve => ("PromiseResolve", Arity::Fixed(1)),
    PromiseReject => ("PromiseReject", Arity::Fixed(1)),
    WrapException => ("WrapException", Arity::Fixed(1)),
    GetSuperMethod => ("GetSuperMethod", Arity::Fixed(2)),
    BigIntAdd => ("BigIntAdd", Arity::Fixed(2)),
    BigIntBitAnd => ("BigIntBitAnd", Arity::Fixed(2)),
    StringIncludes => ("StringIncludes", Arity::Fixed(2)),
    StringSlice => ("StringSlice", Arity::Variadic),
    StringConcat => ("StringConcat", Arity::Fixed(2)),
    ArrayMap => ("ArrayMap", Arity::Fixed(2)),
    ArraySlice => ("ArraySlice", Arity::Variadic),
    ArrayIncludes => ("ArrayIncludes", Arity::Fixed(2)),
    ArrayIndexOf => ("ArrayIndexOf", Arity::Fixed(2)),
    ToNumber => ("ToNumber", Arity::Fixed(1)),
    ToBoolean => ("ToBoolean", Arity::Fixed(1)),
    ConsoleLog => ("ConsoleLog", Arity::Variadic),
    AwaitResume => ("AwaitResume", Arity::Fixed(1)),
}

/// The full catalog as a flat, lookup-friendly table — consumers that need
/// to resolve a runtime function by name (diagnostics, golden-output tests)
/// use this rather than re-deriving it from the enum.
pub struct RuntimeCatalog;

impl RuntimeCatalog {
    pub fn lookup(name: &str) -> Option<RuntimeFn> {
        RuntimeFn::ALL.iter().copied().find(|f| f.entry().name == name)
    }
}
