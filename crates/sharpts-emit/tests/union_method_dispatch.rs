//! A `string | array` union receiver must dispatch `slice`/`concat`/
//! `includes`/`indexOf` to the matching built-in strategy per member, not
//! fall through to the generic name-based call — and since union members are
//! stored in canonical (sorted) order, the string branch is probed before
//! the array branch whenever both match, matching "string before array"
//! preference.

use sharpts_ast::{Primitive, TypeArena, TypeDescriptor};
use sharpts_emit::{dispatch_method_call, Instruction, Receiver};
use sharpts_runtime::RuntimeFn;
use sharpts_unions::UnionSynthesizer;

fn string_or_array_union() -> (TypeArena, sharpts_ast::TypeId) {
    let mut types = TypeArena::new();
    let string_ty = types.intern(TypeDescriptor::Primitive(Primitive::String));
    let number_ty = types.intern(TypeDescriptor::Primitive(Primitive::Number));
    let array_ty = types.intern(TypeDescriptor::Array(number_ty));
    let union_ty = types.intern_union(vec![string_ty, array_ty]);
    (types, union_ty)
}

fn dispatch_for(method: &str) -> sharpts_emit::DispatchPlan {
    let (types, union_ty) = string_or_array_union();
    let unions = UnionSynthesizer::new();
    let mut program = sharpts_ast::Program::new();
    program.types = types;
    let receiver = Receiver { builtin_namespace: None, static_type: Some(union_ty) };
    let method = sharpts_common::Interner::new().intern(method);
    dispatch_method_call(&program.types, &program, &unions, &receiver, &method, 0)
}

#[test]
fn slice_probes_both_members_string_first() {
    let plan = dispatch_for("slice");
    assert!(
        matches!(
            plan.instructions.as_slice(),
            [
                Instruction::UnionUnbox { .. },
                Instruction::CallRuntime(RuntimeFn::StringSlice),
                Instruction::UnionUnbox { .. },
                Instruction::CallRuntime(RuntimeFn::ArraySlice),
            ]
        ),
        "expected string-then-array probes, got: {:?}",
        plan.instructions
    );
}

#[test]
fn concat_only_matches_the_string_member() {
    let plan = dispatch_for("concat");
    assert!(matches!(
        plan.instructions.as_slice(),
        [Instruction::UnionUnbox { .. }, Instruction::CallRuntime(RuntimeFn::StringConcat)]
    ));
}

#[test]
fn index_of_only_matches_the_array_member() {
    let plan = dispatch_for("indexOf");
    assert!(matches!(
        plan.instructions.as_slice(),
        [Instruction::UnionUnbox { .. }, Instruction::CallRuntime(RuntimeFn::ArrayIndexOf)]
    ));
}

#[test]
fn includes_probes_both_members_string_first() {
    let plan = dispatch_for("includes");
    assert!(
        matches!(
            plan.instructions.as_slice(),
            [
                Instruction::UnionUnbox { .. },
                Instruction::CallRuntime(RuntimeFn::StringIncludes),
                Instruction::UnionUnbox { .. },
                Instruction::CallRuntime(RuntimeFn::ArrayIncludes),
            ]
        ),
        "expected string-then-array probes, got: {:?}",
        plan.instructions
    );
}
