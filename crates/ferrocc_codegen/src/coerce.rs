//! The C implicit/explicit conversion matrix, generalized from the
//! teacher's `ExprCodegen::build_cast` (`examples/bherbruck-llts/crates/
//! llts_codegen/src/expr.rs`) from its closed four-int/two-float type set
//! to arbitrary `CType`s, plus the pointer/integer conversions C allows
//! that LLTS's value-type system never needed.

use inkwell::context::Context;
use inkwell::values::BasicValueEnum;
use inkwell::AddressSpace;

use crate::error::LowerError;
use crate::types::CType;
use ferrocc_diag::SourceLocation;

/// Converts `value` (of type `from`) to `to`, implementing C's usual
/// arithmetic conversions and explicit-cast conversions alike — the
/// lowering code that needs an implicit conversion (assignment, `return`,
/// argument passing, the usual-arithmetic-conversion operand balancing) and
/// an explicit `(T)expr` cast both call this; C draws no distinction
/// between the two at the bit-manipulation level, only in which
/// conversions the parser permits to happen implicitly.
pub fn convert<'ctx>(
    context: &'ctx Context,
    builder: &inkwell::builder::Builder<'ctx>,
    value: BasicValueEnum<'ctx>,
    from: &CType,
    to: &CType,
    loc: SourceLocation,
) -> Result<BasicValueEnum<'ctx>, LowerError> {
    let from = from.decayed();
    let to = to.decayed();
    if from == to {
        return Ok(value);
    }

    if to == CType::Void {
        // `(void)expr;` — the value is computed for side effects and discarded.
        return Ok(value);
    }

    if from.is_integer() && to.is_integer() {
        let v = value.into_int_value();
        let target = llvm_int_type(context, &to);
        let from_width = v.get_type().get_bit_width();
        let to_width = target.get_bit_width();
        let result = if from_width == to_width {
            v
        } else if from_width < to_width {
            if from.is_signed_int() {
                builder.build_int_s_extend(v, target, "sext").unwrap()
            } else {
                builder.build_int_z_extend(v, target, "zext").unwrap()
            }
        } else {
            builder.build_int_truncate(v, target, "trunc").unwrap()
        };
        return Ok(result.into());
    }

    if from.is_integer() && to.is_float() {
        let v = value.into_int_value();
        let target = llvm_float_type(context, &to);
        let result = if from.is_signed_int() {
            builder.build_signed_int_to_float(v, target, "sitofp").unwrap()
        } else {
            builder.build_unsigned_int_to_float(v, target, "uitofp").unwrap()
        };
        return Ok(result.into());
    }

    if from.is_float() && to.is_integer() {
        let v = value.into_float_value();
        let target = llvm_int_type(context, &to);
        let result = if to.is_signed_int() {
            builder.build_float_to_signed_int(v, target, "fptosi").unwrap()
        } else {
            builder.build_float_to_unsigned_int(v, target, "fptoui").unwrap()
        };
        return Ok(result.into());
    }

    if from.is_float() && to.is_float() {
        let v = value.into_float_value();
        let target = llvm_float_type(context, &to);
        let from_width = from.bit_width();
        let to_width = to.bit_width();
        let result = if from_width == to_width {
            v
        } else if from_width < to_width {
            builder.build_float_ext(v, target, "fpext").unwrap()
        } else {
            builder.build_float_trunc(v, target, "fptrunc").unwrap()
        };
        return Ok(result.into());
    }

    if from.is_pointer() && to.is_pointer() {
        // All pointers share one opaque LLVM pointer type; a cast between
        // pointer types changes only how later code interprets loads
        // through it, never the bit pattern.
        return Ok(value);
    }

    if from.is_pointer() && to.is_integer() {
        let v = value.into_pointer_value();
        let target = llvm_int_type(context, &to);
        return Ok(builder.build_ptr_to_int(v, target, "ptrtoint").unwrap().into());
    }

    if from.is_integer() && to.is_pointer() {
        let v = value.into_int_value();
        let target = context.ptr_type(AddressSpace::default());
        return Ok(builder.build_int_to_ptr(v, target, "inttoptr").unwrap().into());
    }

    Err(LowerError::InvalidConversion {
        from: from.display_name(),
        to: to.display_name(),
        location: loc,
    })
}

/// C's usual arithmetic conversions (6.3.1.8): of two operand types, the
/// one lower in the conversion rank loses — float beats int, wider beats
/// narrower, unsigned beats signed at equal rank. `int` is the conversion
/// floor: anything narrower than `int` promotes to `int` first.
pub fn usual_arithmetic_conversion(lhs: &CType, rhs: &CType) -> CType {
    let lhs = promote(lhs);
    let rhs = promote(rhs);
    if lhs == rhs {
        return lhs;
    }
    if lhs.is_float() || rhs.is_float() {
        return if lhs.bit_width() >= rhs.bit_width() { lhs } else { rhs };
    }
    let (wide, narrow) = if lhs.bit_width() >= rhs.bit_width() { (lhs, rhs) } else { (rhs, lhs) };
    if wide.bit_width() == narrow.bit_width() {
        if wide.is_unsigned_int() {
            wide
        } else {
            narrow
        }
    } else {
        wide
    }
}

/// Integer promotion: anything narrower than `int` (and enums, which are
/// `int`-valued) promotes to `int` before arithmetic.
pub fn promote(ty: &CType) -> CType {
    match ty {
        CType::Bool | CType::Char { .. } | CType::Short { .. } | CType::Enum { .. } => CType::Int { signed: true },
        other => other.clone(),
    }
}

fn llvm_int_type<'ctx>(context: &'ctx Context, ty: &CType) -> inkwell::types::IntType<'ctx> {
    match ty.bit_width() {
        1 => context.bool_type(),
        8 => context.i8_type(),
        16 => context.i16_type(),
        32 => context.i32_type(),
        _ => context.i64_type(),
    }
}

fn llvm_float_type<'ctx>(context: &'ctx Context, ty: &CType) -> inkwell::types::FloatType<'ctx> {
    match ty {
        CType::Float => context.f32_type(),
        CType::LongDouble => context.f128_type(),
        _ => context.f64_type(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_and_int_promote_to_int() {
        let result = usual_arithmetic_conversion(&CType::Char { signed: true }, &CType::Int { signed: true });
        assert_eq!(result, CType::Int { signed: true });
    }

    #[test]
    fn int_and_double_convert_to_double() {
        let result = usual_arithmetic_conversion(&CType::Int { signed: true }, &CType::Double);
        assert_eq!(result, CType::Double);
    }

    #[test]
    fn same_rank_unsigned_wins_over_signed() {
        let result = usual_arithmetic_conversion(&CType::Int { signed: true }, &CType::Int { signed: false });
        assert_eq!(result, CType::Int { signed: false });
    }
}
