//! Method/call dispatch chain. Each `try_*` function attempts one strategy
//! and returns `None` to fall through to the next, in priority order:
//! (1) built-in special form (`console.log`, `JSON.stringify`, ...),
//! (2) type-strategy table, (3) `Promise` instance method, (4) direct class
//! dispatch, (5) union member dispatch, (6) name-based fallback,
//! (7) indirect call.

use crate::instr::Instruction;
use crate::stack_repr::StackRepr;
use sharpts_ast::{ClassPlan, Program, TypeArena, TypeDescriptor};
use sharpts_common::Atom;
use sharpts_runtime::RuntimeFn;
use sharpts_unions::UnionSynthesizer;

/// The receiver of a method call, already emitted onto the stack by the
/// caller, described well enough for dispatch to pick a strategy.
pub struct Receiver<'a> {
    pub builtin_namespace: Option<&'a str>,
    pub static_type: Option<sharpts_ast::TypeId>,
}

fn builtin_runtime_fn(namespace: &str, method: &str) -> Option<RuntimeFn> {
    match (namespace, method) {
        ("console", "log") => Some(RuntimeFn::ConsoleLog),
        ("JSON", "stringify") => Some(RuntimeFn::Stringify),
        ("Object", "keys") | ("Object", "values") => Some(RuntimeFn::GetProperty),
        _ => None,
    }
}

fn type_strategy_fn(arena: &TypeArena, ty: sharpts_ast::TypeId, method: &str) -> Option<RuntimeFn> {
    if arena.is_string(ty) {
        return match method {
            "includes" => Some(RuntimeFn::StringIncludes),
            "slice" => Some(RuntimeFn::StringSlice),
            "concat" => Some(RuntimeFn::StringConcat),
            _ => None,
        };
    }
    if let TypeDescriptor::Array(_) = arena.get(ty) {
        return match method {
            "map" => Some(RuntimeFn::ArrayMap),
            "slice" => Some(RuntimeFn::ArraySlice),
            "includes" => Some(RuntimeFn::ArrayIncludes),
            "indexOf" => Some(RuntimeFn::ArrayIndexOf),
            _ => None,
        };
    }
    None
}

fn promise_method_fn(arena: &TypeArena, ty: sharpts_ast::TypeId, method: &str) -> Option<RuntimeFn> {
    if !matches!(arena.get(ty), TypeDescriptor::Promise(_)) {
        return None;
    }
    match method {
        "then" => Some(RuntimeFn::PromiseThen),
        "catch" => Some(RuntimeFn::PromiseCatch),
        "finally" => Some(RuntimeFn::PromiseFinally),
        _ => None,
    }
}

fn resolve_method_in_hierarchy<'p>(program: &'p Program, class: &'p ClassPlan, method: &str) -> Option<&'p sharpts_ast::MethodPlan> {
    for m in &class.methods {
        let plan = program.function(m.function);
        if plan.qualified_name.as_str().ends_with(method) {
            return Some(m);
        }
    }
    let base = class.base_class?;
    let base_class = program.classes.get(&base)?;
    resolve_method_in_hierarchy(program, base_class, method)
}

/// Result of picking a call-dispatch strategy: the instructions needed
/// after the receiver and arguments are already on the stack, plus the
/// resulting `StackRepr`.
pub struct DispatchPlan {
    pub instructions: Vec<Instruction>,
    pub result: StackRepr,
}

/// Try each strategy in priority order; `name-based fallback` always
/// succeeds so this never returns `None` when `method` is `Some`.
pub fn dispatch_method_call(
    arena: &TypeArena,
    program: &Program,
    unions: &UnionSynthesizer,
    receiver: &Receiver,
    method: &Atom,
    arg_count: u32,
) -> DispatchPlan {
    if let Some(ns) = receiver.builtin_namespace {
        if let Some(func) = builtin_runtime_fn(ns, method.as_str()) {
            return DispatchPlan { instructions: vec![Instruction::CallRuntime(func)], result: StackRepr::Unknown };
        }
    }
    if let Some(ty) = receiver.static_type {
        if let Some(func) = type_strategy_fn(arena, ty, method.as_str()) {
            return DispatchPlan { instructions: vec![Instruction::CallRuntime(func)], result: StackRepr::Unknown };
        }
        if let Some(func) = promise_method_fn(arena, ty, method.as_str()) {
            return DispatchPlan { instructions: vec![Instruction::CallRuntime(func)], result: StackRepr::Unknown };
        }
        if let TypeDescriptor::Instance(class_id) = arena.get(ty) {
            if let Some(class) = program.classes.get(class_id) {
                if let Some(m) = resolve_method_in_hierarchy(program, class, method.as_str()) {
                    return DispatchPlan {
                        instructions: vec![Instruction::CallDirect { function: m.function, arg_count }],
                        result: StackRepr::Unknown,
                    };
                }
            }
        }
        if arena.is_union(ty) {
            let layout = unions.get_or_create(arena, ty);
            // Each member gets its own unboxed probe, tried against every
            // strategy in the same priority order as a non-union receiver
            // (built-in type strategy, then `Promise`, then a resolved
            // class method), so e.g. a `string | array` union dispatches
            // `slice`/`concat`/`includes`/`indexOf` per member instead of
            // always falling through to the generic name-based call; member
            // order follows declaration order, so `string | array` probes
            // the string branch first. The emitted shape is a sequence of
            // `UnionUnbox { tag }` probes rather than a full jump table,
            // since which branch actually runs is a runtime decision this
            // workspace never executes.
            let mut instructions = Vec::new();
            for member in layout.members() {
                let call = type_strategy_fn(arena, member.ty, method.as_str())
                    .or_else(|| promise_method_fn(arena, member.ty, method.as_str()))
                    .map(Instruction::CallRuntime)
                    .or_else(|| {
                        let TypeDescriptor::Instance(class_id) = arena.get(member.ty) else { return None };
                        let class = program.classes.get(class_id)?;
                        let m = resolve_method_in_hierarchy(program, class, method.as_str())?;
                        Some(Instruction::CallDirect { function: m.function, arg_count })
                    });
                if let Some(call) = call {
                    instructions.push(Instruction::UnionUnbox { tag: member.tag });
                    instructions.push(call);
                }
            }
            if !instructions.is_empty() {
                return DispatchPlan { instructions, result: StackRepr::Unknown };
            }
        }
    }
    // Name-based fallback: look the property up at runtime and invoke it.
    DispatchPlan {
        instructions: vec![
            Instruction::GetProperty(method.clone()),
            Instruction::CallRuntime(RuntimeFn::InvokeValue),
        ],
        result: StackRepr::Unknown,
    }
}

/// An ordinary call whose callee is a bare value (not a property access):
/// always an indirect call through the callable's slot.
pub fn dispatch_indirect_call(arg_count: u32) -> DispatchPlan {
    DispatchPlan { instructions: vec![Instruction::CallIndirect { arg_count }], result: StackRepr::Unknown }
}
