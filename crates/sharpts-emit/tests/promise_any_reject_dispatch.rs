//! Boundary scenario: `Promise.any([...]).catch(e => console.log("fail"))`.
//! This workspace never executes emitted code, so what's checked here is the
//! emission shape: a `.catch` call on a statically-known `Promise<T>`
//! receiver dispatches through `RuntimeFn::PromiseCatch` rather than falling
//! through to the generic name-based call.

use sharpts_ast::{Primitive, TypeArena, TypeDescriptor};
use sharpts_emit::{dispatch_method_call, Instruction, Receiver};
use sharpts_runtime::RuntimeFn;
use sharpts_unions::UnionSynthesizer;

#[test]
fn catch_on_a_promise_receiver_dispatches_to_promise_catch() {
    let mut types = TypeArena::new();
    let string_ty = types.intern(TypeDescriptor::Primitive(Primitive::String));
    let promise_ty = types.intern(TypeDescriptor::Promise(string_ty));

    let unions = UnionSynthesizer::new();
    let mut program = sharpts_ast::Program::new();
    program.types = types;

    let receiver = Receiver { builtin_namespace: None, static_type: Some(promise_ty) };
    let method = sharpts_common::Interner::new().intern("catch");
    let plan = dispatch_method_call(&program.types, &program, &unions, &receiver, &method, 1);

    assert!(matches!(plan.instructions.as_slice(), [Instruction::CallRuntime(RuntimeFn::PromiseCatch)]));
}
