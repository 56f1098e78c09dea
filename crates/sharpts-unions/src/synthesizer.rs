//! `UnionSynthesizer` — builds and caches `UnionLayout`s across every module
//! being compiled, so two call sites that reference the same union type
//! share one tag assignment.

use crate::layout::UnionLayout;
use dashmap::DashMap;
use sharpts_ast::{TypeArena, TypeDescriptor, TypeId};
use std::sync::Arc;

/// Concurrent cache from a union's `TypeId` to its finalized layout. Reads
/// and writes can come from different modules processed in parallel by the
/// module planner, so this uses `DashMap` rather than a `RefCell`-guarded
/// `HashMap`.
#[derive(Default)]
pub struct UnionSynthesizer {
    cache: DashMap<TypeId, Arc<UnionLayout>>,
}

impl UnionSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached layout for `type_id`, building one on first
    /// request. Panics if `type_id` does not name a `TypeDescriptor::Union`
    /// in `arena` — callers only invoke this for types already known to be
    /// unions.
    pub fn get_or_create(&self, arena: &TypeArena, type_id: TypeId) -> Arc<UnionLayout> {
        if let Some(existing) = self.cache.get(&type_id) {
            return existing.clone();
        }
        let members = match arena.get(type_id) {
            TypeDescriptor::Union(members) => members.clone(),
            other => panic!("get_or_create called on non-union type {other:?}"),
        };
        let layout = Arc::new(UnionLayout::new(type_id, &members));
        self.cache.insert(type_id, layout.clone());
        layout
    }

    pub fn get(&self, type_id: TypeId) -> Option<Arc<UnionLayout>> {
        self.cache.get(&type_id).map(|entry| entry.clone())
    }

    /// A deterministic snapshot of every layout built so far, sorted by
    /// `TypeId` so two runs over the same program produce the same order.
    pub fn finalize_all(&self) -> Vec<Arc<UnionLayout>> {
        let mut layouts: Vec<_> = self.cache.iter().map(|entry| entry.value().clone()).collect();
        layouts.sort_by_key(|l| l.type_id.0);
        layouts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharpts_ast::Primitive;

    #[test]
    fn repeated_lookup_returns_same_layout() {
        let mut arena = TypeArena::new();
        let number = arena.intern(TypeDescriptor::Primitive(Primitive::Number));
        let string = arena.intern(TypeDescriptor::Primitive(Primitive::String));
        let union = arena.intern_union(vec![number, string]);

        let synth = UnionSynthesizer::new();
        let a = synth.get_or_create(&arena, union);
        let b = synth.get_or_create(&arena, union);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.tag_of(number), Some(0));
        assert_eq!(a.tag_of(string), Some(1));
    }

    #[test]
    fn finalize_all_is_sorted_and_deduplicated() {
        let mut arena = TypeArena::new();
        let number = arena.intern(TypeDescriptor::Primitive(Primitive::Number));
        let string = arena.intern(TypeDescriptor::Primitive(Primitive::String));
        let boolean = arena.intern(TypeDescriptor::Primitive(Primitive::Bool));
        let u1 = arena.intern_union(vec![number, string]);
        let u2 = arena.intern_union(vec![string, boolean]);

        let synth = UnionSynthesizer::new();
        synth.get_or_create(&arena, u2);
        synth.get_or_create(&arena, u1);
        synth.get_or_create(&arena, u1);

        let all = synth.finalize_all();
        assert_eq!(all.len(), 2);
        assert!(all[0].type_id.0 <= all[1].type_id.0);
    }
}
