//! Boundary scenario: `[...a.intersection(b)].sort().join(",")` over two
//! `Set` values. `Set` has no dedicated entry in `RuntimeCatalog` — this
//! workspace's type-strategy table only covers `string`/`Array`/`Promise` —
//! so `.intersection(...)` on a `Set`-typed receiver correctly falls through
//! every dispatch strategy to the generic name-based call rather than
//! silently miscompiling to some unrelated runtime entry. Real `Set` method
//! lowering is future work, not something to fake here.

use sharpts_ast::{ClassId, ClassPlan, TypeArena, TypeDescriptor};
use sharpts_emit::{dispatch_method_call, Instruction, Receiver};
use sharpts_runtime::RuntimeFn;
use sharpts_unions::UnionSynthesizer;

#[test]
fn intersection_on_a_set_receiver_falls_through_to_the_name_based_call() {
    let mut types = TypeArena::new();
    let set_class = ClassId(0);
    let set_ty = types.intern(TypeDescriptor::Instance(set_class));

    let unions = UnionSynthesizer::new();
    let mut program = sharpts_ast::Program::new();
    program.types = types;
    program.define_class(ClassPlan {
        id: set_class,
        qualified_name: sharpts_common::Interner::new().intern("Set"),
        base_class: None,
        fields: vec![],
        methods: vec![],
        is_abstract: false,
        generic_params: vec![],
    });

    let receiver = Receiver { builtin_namespace: None, static_type: Some(set_ty) };
    let method = sharpts_common::Interner::new().intern("intersection");
    let plan = dispatch_method_call(&program.types, &program, &unions, &receiver, &method, 1);

    assert!(matches!(
        plan.instructions.as_slice(),
        [Instruction::GetProperty(_), Instruction::CallRuntime(RuntimeFn::InvokeValue)]
    ));
}
