//! `UnionLayout` — the runtime shape decided for one union type: a tag per
//! member plus the accessor names the emitter calls to move values in and
//! out of the tagged representation.

use sharpts_ast::TypeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnionMember {
    pub ty: TypeId,
    pub tag: u32,
}

/// The finalized plan for a union type. Built once per distinct member set
/// and shared by every call site that needs it.
#[derive(Clone, Debug)]
pub struct UnionLayout {
    pub type_id: TypeId,
    members: Vec<UnionMember>,
}

impl UnionLayout {
    pub(crate) fn new(type_id: TypeId, member_types: &[TypeId]) -> Self {
        let members =
            member_types.iter().enumerate().map(|(i, &ty)| UnionMember { ty, tag: i as u32 }).collect();
        Self { type_id, members }
    }

    pub fn members(&self) -> &[UnionMember] {
        &self.members
    }

    /// The tag assigned to `ty` within this union, or `None` if `ty` is not
    /// one of its members.
    pub fn tag_of(&self, ty: TypeId) -> Option<u32> {
        self.members.iter().find(|m| m.ty == ty).map(|m| m.tag)
    }

    pub fn is_member(&self, ty: TypeId) -> bool {
        self.members.iter().any(|m| m.ty == ty)
    }

    /// The member type for a given tag, used when projecting a narrowed
    /// value back out of its tagged box.
    pub fn member_at(&self, tag: u32) -> Option<TypeId> {
        self.members.iter().find(|m| m.tag == tag).map(|m| m.ty)
    }
}
