//! Implicit-conversion and narrowing decisions for union-typed values,
//! consumed by the emitter when it lowers `UnionConvert`/`UnionProject`
//! expression nodes.

use crate::layout::UnionLayout;
use sharpts_ast::TypeId;

/// How a value flows into or out of a union's tagged representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversionKind {
    /// `source` is already the union; no boxing needed.
    Identity,
    /// `source` is one member type; box it under its tag.
    Widen { tag: u32 },
    /// The union is consumed where a specific member type is expected;
    /// unbox and, in debug builds, assert the tag matches.
    Narrow { tag: u32 },
}

/// Decide how a value of type `source` should be converted to/from
/// `layout`'s union representation.
///
/// Returns `None` when `source` is the union's own `TypeId` but neither
/// widening nor narrowing applies (already in the right representation) —
/// callers treat `None` as "no lowering needed" the same as `Identity`.
pub fn plan_conversion(layout: &UnionLayout, source: TypeId) -> ConversionKind {
    if source == layout.type_id {
        return ConversionKind::Identity;
    }
    if let Some(tag) = layout.tag_of(source) {
        return ConversionKind::Widen { tag };
    }
    panic!("type {source:?} is not a member of union {:?} and is not the union itself", layout.type_id);
}

/// Plan the narrowing needed to read a union value as member type
/// `target`, used for `x as T` and `typeof`-narrowed branches.
pub fn plan_narrow(layout: &UnionLayout, target: TypeId) -> ConversionKind {
    let tag = layout
        .tag_of(target)
        .unwrap_or_else(|| panic!("type {target:?} is not a member of union {:?}", layout.type_id));
    ConversionKind::Narrow { tag }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharpts_ast::{Primitive, TypeArena, TypeDescriptor};

    #[test]
    fn member_type_widens_with_its_tag() {
        let mut arena = TypeArena::new();
        let number = arena.intern(TypeDescriptor::Primitive(Primitive::Number));
        let string = arena.intern(TypeDescriptor::Primitive(Primitive::String));
        let union_id = arena.intern_union(vec![number, string]);
        let layout = crate::layout::UnionLayout::new(union_id, &[number, string]);

        assert_eq!(plan_conversion(&layout, number), ConversionKind::Widen { tag: 0 });
        assert_eq!(plan_conversion(&layout, union_id), ConversionKind::Identity);
    }

    #[test]
    fn narrow_resolves_member_tag() {
        let mut arena = TypeArena::new();
        let number = arena.intern(TypeDescriptor::Primitive(Primitive::Number));
        let string = arena.intern(TypeDescriptor::Primitive(Primitive::String));
        let union_id = arena.intern_union(vec![number, string]);
        let layout = crate::layout::UnionLayout::new(union_id, &[number, string]);

        assert_eq!(plan_narrow(&layout, string), ConversionKind::Narrow { tag: 1 });
    }
}
