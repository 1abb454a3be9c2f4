//! C's type system, lowered from `ferrocc_ast` type nodes — spec.md §4.F.3.
//!
//! Generalizes the teacher's `LltsType`/`TypeRegistry` pair
//! (`examples/bherbruck-llts/crates/llts_codegen/src/types.rs`) from LLTS's
//! fixed value-type set to C's declarator-built type system: pointers,
//! arrays, function types, and named struct/union/enum types resolved by
//! tag instead of structurally.

use std::collections::HashMap;

use ferrocc_ast::{Arena, NodeId, NodeKind, Payload};
use ferrocc_diag::SourceLocation;
use inkwell::context::Context;
use inkwell::types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType, StructType};
use inkwell::AddressSpace;

use crate::error::LowerError;

/// A C type, resolved from the AST's declarator-built type trees into a
/// flat value the rest of codegen can match on without re-walking nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum CType {
    Void,
    Bool,
    Char { signed: bool },
    Short { signed: bool },
    Int { signed: bool },
    Long { signed: bool },
    LongLong { signed: bool },
    Float,
    Double,
    LongDouble,
    Pointer(Box<CType>),
    /// `size` is `None` for an incomplete array (`extern int a[];`) or a
    /// parameter's decayed `T[]`/`T[N]`, which both collapse to a pointer
    /// wherever they're actually used as a value.
    Array { elem: Box<CType>, size: Option<u64> },
    Function {
        params: Vec<CType>,
        ret: Box<CType>,
        variadic: bool,
    },
    Struct {
        name: String,
        fields: Vec<(String, CType)>,
    },
    Union {
        name: String,
        variants: Vec<(String, CType)>,
    },
    /// C enums are `int` at the value level; the tag is kept only for
    /// diagnostics and `_Generic`/`__builtin_types_compatible_p` matching.
    Enum { name: String },
}

impl CType {
    pub fn is_signed_int(&self) -> bool {
        matches!(
            self,
            CType::Char { signed: true }
                | CType::Short { signed: true }
                | CType::Int { signed: true }
                | CType::Long { signed: true }
                | CType::LongLong { signed: true }
                | CType::Enum { .. }
        )
    }

    pub fn is_unsigned_int(&self) -> bool {
        matches!(
            self,
            CType::Bool
                | CType::Char { signed: false }
                | CType::Short { signed: false }
                | CType::Int { signed: false }
                | CType::Long { signed: false }
                | CType::LongLong { signed: false }
        )
    }

    pub fn is_integer(&self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    pub fn is_float(&self) -> bool {
        matches!(self, CType::Float | CType::Double | CType::LongDouble)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, CType::Pointer(_))
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, CType::Struct { .. } | CType::Union { .. })
    }

    /// Array-to-pointer decay, applied wherever an array value is used as
    /// an operand (spec.md §4.F's parameter/expression decay rule).
    pub fn decayed(&self) -> CType {
        match self {
            CType::Array { elem, .. } => CType::Pointer(elem.clone()),
            other => other.clone(),
        }
    }

    pub fn bit_width(&self) -> u32 {
        match self {
            CType::Bool => 1,
            CType::Char { .. } => 8,
            CType::Short { .. } => 16,
            CType::Int { .. } | CType::Enum { .. } => 32,
            CType::Long { .. } | CType::LongLong { .. } => 64,
            CType::Float => 32,
            CType::Double => 64,
            CType::LongDouble => 128,
            _ => 0,
        }
    }

    /// Natural size in bytes, used by `sizeof` and struct/union layout
    /// (`crate::layout`). Aggregates recurse through `crate::layout::layout_of`
    /// rather than duplicating the alignment rule here.
    pub fn size_of(&self) -> u64 {
        match self {
            CType::Void => 0,
            CType::Bool | CType::Char { .. } => 1,
            CType::Short { .. } => 2,
            CType::Int { .. } | CType::Float | CType::Enum { .. } => 4,
            CType::Long { .. } | CType::LongLong { .. } | CType::Double | CType::Pointer(_) => 8,
            CType::LongDouble => 16,
            CType::Array { elem, size } => elem.size_of() * size.unwrap_or(0),
            CType::Function { .. } => 8,
            CType::Struct { .. } | CType::Union { .. } => crate::layout::layout_of(self).size,
        }
    }

    /// Natural alignment in bytes (spec.md §9's "align to the field's own
    /// size" rule, applied recursively for aggregates).
    pub fn align_of(&self) -> u64 {
        match self {
            CType::Array { elem, .. } => elem.align_of(),
            CType::Struct { .. } | CType::Union { .. } => crate::layout::layout_of(self).align,
            other => other.size_of().max(1),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            CType::Void => "void".to_string(),
            CType::Bool => "_Bool".to_string(),
            CType::Char { signed } => if *signed { "char" } else { "unsigned char" }.to_string(),
            CType::Short { signed } => if *signed { "short" } else { "unsigned short" }.to_string(),
            CType::Int { signed } => if *signed { "int" } else { "unsigned int" }.to_string(),
            CType::Long { signed } => if *signed { "long" } else { "unsigned long" }.to_string(),
            CType::LongLong { signed } => {
                if *signed { "long long" } else { "unsigned long long" }.to_string()
            }
            CType::Float => "float".to_string(),
            CType::Double => "double".to_string(),
            CType::LongDouble => "long double".to_string(),
            CType::Pointer(inner) => format!("{}*", inner.display_name()),
            CType::Array { elem, size } => match size {
                Some(n) => format!("{}[{n}]", elem.display_name()),
                None => format!("{}[]", elem.display_name()),
            },
            CType::Function { ret, .. } => format!("{} (*)(...)", ret.display_name()),
            CType::Struct { name, .. } => format!("struct {name}"),
            CType::Union { name, .. } => format!("union {name}"),
            CType::Enum { name } => format!("enum {name}"),
        }
    }
}

/// Named types visible while resolving a type node: typedefs, and
/// struct/union/enum tags that have already been seen with a body.
/// Populated during `ferrocc_codegen::decl`'s first declaration pass so
/// that a forward reference (`struct Node *next;` inside `struct Node`
/// itself) resolves once the full definition is registered.
#[derive(Debug, Default)]
pub struct TypeEnv {
    pub typedefs: HashMap<String, CType>,
    pub structs: HashMap<String, CType>,
    pub unions: HashMap<String, CType>,
    pub enums: HashMap<String, CType>,
}

/// Resolves a `ferrocc_ast` type-node subtree (`BuiltinType`, `PointerType`,
/// `ArrayType`, `FunctionType`, `StructType`, `UnionType`, `EnumType`,
/// `TypedefType`, `AtomicType`) into a `CType`.
pub fn resolve_type(node: NodeId, arena: &Arena, env: &TypeEnv, loc: SourceLocation) -> Result<CType, LowerError> {
    let n = arena.get(node);
    match n.kind {
        NodeKind::BuiltinType => {
            let Payload::Type { name, is_signed, .. } = &n.payload else {
                unreachable!("BuiltinType always carries Payload::Type")
            };
            Ok(builtin_ctype(name, *is_signed))
        }
        NodeKind::AtomicType => {
            // `_Atomic(T)` — ferrocc has no atomic-op lowering (spec.md's
            // Non-goals exclude concurrency primitives beyond recognizing
            // the keyword), so the wrapped type is used as-is.
            resolve_type(n.children[0], arena, env, loc)
        }
        NodeKind::PointerType => {
            let inner = resolve_type(n.children[0], arena, env, loc)?;
            Ok(CType::Pointer(Box::new(inner)))
        }
        NodeKind::ArrayType => {
            let elem = resolve_type(n.children[0], arena, env, loc)?;
            // The size expression (if any) is evaluated by
            // `ferrocc_codegen::expr::const_eval_usize`, not here — this
            // module only resolves types, not constant expressions.
            let size = n.children.get(1).and_then(|&e| crate::expr::const_eval_usize(e, arena));
            Ok(CType::Array { elem: Box::new(elem), size })
        }
        NodeKind::FunctionType => {
            let Payload::FunctionType { is_variadic } = &n.payload else {
                unreachable!("FunctionType always carries Payload::FunctionType")
            };
            let ret = resolve_type(n.children[0], arena, env, loc)?;
            let params = n.children[1..]
                .iter()
                .map(|&p| {
                    let ty_node = arena.get(p).children[0];
                    resolve_type(ty_node, arena, env, loc).map(|t| t.decayed())
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CType::Function {
                params,
                ret: Box::new(ret),
                variadic: *is_variadic,
            })
        }
        NodeKind::StructType | NodeKind::UnionType => {
            let Payload::Tag { name } = &n.payload else {
                unreachable!("StructType/UnionType always carries Payload::Tag")
            };
            if !n.children.is_empty() {
                let fields = n
                    .children
                    .iter()
                    .map(|&f| lower_field(f, arena, env, loc))
                    .collect::<Result<Vec<_>, _>>()?;
                let tag = name.clone().unwrap_or_default();
                return Ok(if n.kind == NodeKind::StructType {
                    CType::Struct { name: tag, fields }
                } else {
                    CType::Union { name: tag, variants: fields }
                });
            }
            let tag = name.as_deref().unwrap_or("");
            let table = if n.kind == NodeKind::StructType { &env.structs } else { &env.unions };
            table.get(tag).cloned().ok_or_else(|| LowerError::UndefinedType {
                name: tag.to_string(),
                location: loc,
            })
        }
        NodeKind::EnumType => {
            let Payload::Tag { name } = &n.payload else {
                unreachable!("EnumType always carries Payload::Tag")
            };
            Ok(CType::Enum { name: name.clone().unwrap_or_default() })
        }
        NodeKind::TypedefType => {
            let Payload::Type { name, .. } = &n.payload else {
                unreachable!("TypedefType always carries Payload::Type")
            };
            env.typedefs.get(name).cloned().ok_or_else(|| LowerError::UndefinedType {
                name: name.clone(),
                location: loc,
            })
        }
        other => Err(LowerError::Unsupported {
            context: "type resolution",
            reason: format!("{other:?} is not a type node"),
            location: loc,
        }),
    }
}

fn lower_field(field: NodeId, arena: &Arena, env: &TypeEnv, loc: SourceLocation) -> Result<(String, CType), LowerError> {
    let n = arena.get(field);
    let name = match &n.payload {
        Payload::Field { name } => name.clone(),
        _ => unreachable!("struct/union body only contains FieldDecl/BitfieldDecl"),
    };
    let ty = resolve_type(n.children[0], arena, env, loc)?;
    Ok((name, ty))
}

fn builtin_ctype(name: &str, is_signed: bool) -> CType {
    match name {
        "void" => CType::Void,
        "_Bool" => CType::Bool,
        "char" => CType::Char { signed: is_signed },
        "short" => CType::Short { signed: is_signed },
        "long" => CType::Long { signed: is_signed },
        "long long" => CType::LongLong { signed: is_signed },
        "float" => CType::Float,
        "double" => CType::Double,
        "long double" => CType::LongDouble,
        _ => CType::Int { signed: is_signed },
    }
}

/// Caches LLVM struct/union types per name so recursive and repeated
/// references reuse one `StructType`, the same opaque-then-`set_body`
/// two-step the teacher's `TypeRegistry::declare_struct`/`define_struct`
/// uses for forward/self-referential structs.
pub struct TypeRegistry<'ctx> {
    context: &'ctx Context,
    cache: HashMap<String, StructType<'ctx>>,
}

impl<'ctx> TypeRegistry<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self { context, cache: HashMap::new() }
    }

    pub fn llvm_type(&mut self, ty: &CType) -> BasicTypeEnum<'ctx> {
        match ty {
            CType::Void => self.context.i8_type().into(), // never directly stored; see lib.rs's void handling
            CType::Bool => self.context.bool_type().into(),
            CType::Char { .. } => self.context.i8_type().into(),
            CType::Short { .. } => self.context.i16_type().into(),
            CType::Int { .. } | CType::Enum { .. } => self.context.i32_type().into(),
            CType::Long { .. } | CType::LongLong { .. } => self.context.i64_type().into(),
            CType::Float => self.context.f32_type().into(),
            CType::Double => self.context.f64_type().into(),
            CType::LongDouble => self.context.f128_type().into(),
            CType::Pointer(_) | CType::Function { .. } => self.context.ptr_type(AddressSpace::default()).into(),
            CType::Array { elem, size } => {
                let elem_ty = self.llvm_type(elem);
                elem_ty.array_type(size.unwrap_or(0) as u32).into()
            }
            CType::Struct { name, fields } => self.struct_type(name, fields, false).into(),
            CType::Union { name, variants } => self.union_llvm_type(name, variants).into(),
        }
    }

    pub fn fn_type(&mut self, params: &[CType], ret: &CType, variadic: bool) -> FunctionType<'ctx> {
        let param_types: Vec<BasicMetadataTypeEnum<'ctx>> =
            params.iter().map(|p| self.llvm_type(p).into()).collect();
        match ret {
            CType::Void => self.context.void_type().fn_type(&param_types, variadic),
            _ => self.llvm_type(ret).fn_type(&param_types, variadic),
        }
    }

    pub fn declare_struct(&mut self, name: &str) -> StructType<'ctx> {
        if let Some(&cached) = self.cache.get(name) {
            return cached;
        }
        let opaque = self.context.opaque_struct_type(name);
        self.cache.insert(name.to_string(), opaque);
        opaque
    }

    pub fn define_struct(&mut self, name: &str, fields: &[(String, CType)]) -> StructType<'ctx> {
        let st = self.declare_struct(name);
        let field_types: Vec<BasicTypeEnum<'ctx>> = fields.iter().map(|(_, t)| self.llvm_type(t)).collect();
        if st.is_opaque() {
            st.set_body(&field_types, false);
        }
        st
    }

    fn struct_type(&mut self, name: &str, fields: &[(String, CType)], packed: bool) -> StructType<'ctx> {
        if let Some(&cached) = self.cache.get(name) {
            if !cached.is_opaque() {
                return cached;
            }
        }
        let opaque = self.declare_struct(name);
        let field_types: Vec<BasicTypeEnum<'ctx>> = fields.iter().map(|(_, t)| self.llvm_type(t)).collect();
        if opaque.is_opaque() {
            opaque.set_body(&field_types, packed);
        }
        opaque
    }

    /// A union lowers to `{ i8, [N x i8] }` padding out to its largest
    /// member's size, the same tagged-payload shape the teacher's
    /// `union_type` uses for its discriminated unions, minus the
    /// discriminant (C unions carry no runtime tag).
    fn union_llvm_type(&mut self, name: &str, variants: &[(String, CType)]) -> StructType<'ctx> {
        if let Some(&cached) = self.cache.get(name) {
            if !cached.is_opaque() {
                return cached;
            }
        }
        let opaque = self.declare_struct(name);
        let max_size = variants.iter().map(|(_, t)| t.size_of()).max().unwrap_or(0);
        let body: BasicTypeEnum<'ctx> = if max_size == 0 {
            self.context.struct_type(&[], false).into()
        } else {
            self.context.i8_type().array_type(max_size as u32).into()
        };
        if opaque.is_opaque() {
            opaque.set_body(&[body], false);
        }
        opaque
    }
}
