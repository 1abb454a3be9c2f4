//! Struct/union layout — size, alignment, and per-field byte offsets.
//!
//! The teacher's `LltsType` has no user-defined aggregate layout to compute
//! (its `Struct`/`Union` variants store LLVM-computed sizes only for
//! union-payload sizing, `llts_codegen::types::type_size`). C structs need
//! real field offsets for `offsetof` and for manual byte-level work
//! (`memcpy`-style initialization of padding), so this module adds what the
//! teacher's `type_size`/`type_size_of` pair doesn't need to provide.

use crate::types::CType;

/// spec.md §9's resolved natural-alignment rule: each field aligns to its
/// own size (its `CType::align_of()`, itself recursive for nested
/// aggregates), and the aggregate's overall size rounds up to its largest
/// member's alignment. No `#pragma pack`/`__attribute__((packed))` support —
/// spec.md's Non-goals exclude non-default struct packing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub size: u64,
    pub align: u64,
    /// Byte offset of each field/variant, same order as the `CType`'s
    /// `fields`/`variants` vector.
    pub field_offsets: Vec<u64>,
}

pub fn layout_of(ty: &CType) -> Layout {
    match ty {
        CType::Struct { fields, .. } => layout_sequential(fields.iter().map(|(_, t)| t)),
        CType::Union { variants, .. } => layout_union(variants.iter().map(|(_, t)| t)),
        other => {
            let size = other.size_of();
            Layout { size, align: size.max(1), field_offsets: Vec::new() }
        }
    }
}

fn layout_sequential<'a>(fields: impl Iterator<Item = &'a CType>) -> Layout {
    let mut offset = 0u64;
    let mut align = 1u64;
    let mut field_offsets = Vec::new();
    for field in fields {
        let field_align = field.align_of().max(1);
        let field_size = field.size_of();
        offset = round_up(offset, field_align);
        field_offsets.push(offset);
        offset += field_size;
        align = align.max(field_align);
    }
    let size = round_up(offset, align);
    Layout { size: size.max(1), align, field_offsets }
}

fn layout_union<'a>(variants: impl Iterator<Item = &'a CType>) -> Layout {
    let mut max_size = 0u64;
    let mut align = 1u64;
    let field_offsets: Vec<u64> = variants
        .map(|v| {
            max_size = max_size.max(v.size_of());
            align = align.max(v.align_of().max(1));
            0
        })
        .collect();
    Layout { size: round_up(max_size, align).max(1), align, field_offsets }
}

fn round_up(value: u64, align: u64) -> u64 {
    if align == 0 {
        return value;
    }
    (value + align - 1) / align * align
}

/// Byte offset of `field_index` within `ty` (the implementation behind
/// `offsetof(T, field)`, spec.md §4.F.6).
pub fn offset_of(ty: &CType, field_index: usize) -> u64 {
    layout_of(ty).field_offsets.get(field_index).copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_with_mixed_sizes_pads_between_fields() {
        // struct { char a; int b; };
        let ty = CType::Struct {
            name: "S".to_string(),
            fields: vec![
                ("a".to_string(), CType::Char { signed: true }),
                ("b".to_string(), CType::Int { signed: true }),
            ],
        };
        let layout = layout_of(&ty);
        assert_eq!(layout.field_offsets, vec![0, 4]);
        assert_eq!(layout.size, 8);
        assert_eq!(layout.align, 4);
    }

    #[test]
    fn trailing_padding_rounds_size_to_alignment() {
        // struct { int a; char b; };
        let ty = CType::Struct {
            name: "T".to_string(),
            fields: vec![
                ("a".to_string(), CType::Int { signed: true }),
                ("b".to_string(), CType::Char { signed: true }),
            ],
        };
        let layout = layout_of(&ty);
        assert_eq!(layout.field_offsets, vec![0, 4]);
        assert_eq!(layout.size, 8);
    }

    #[test]
    fn union_size_is_largest_variant_and_all_offsets_are_zero() {
        let ty = CType::Union {
            name: "U".to_string(),
            variants: vec![
                ("i".to_string(), CType::Int { signed: true }),
                ("d".to_string(), CType::Double),
            ],
        };
        let layout = layout_of(&ty);
        assert_eq!(layout.size, 8);
        assert_eq!(layout.align, 8);
        assert_eq!(layout.field_offsets, vec![0, 0]);
    }
}
