//! The elementwise transform engine.
//!
//! ## Purpose
//!
//! Generic fan-out for elementwise operations over one or two Variables:
//! validate the concrete element kinds, align strided layouts to the
//! widest input shape, apply a closure elementwise, and produce either a
//! fresh Variable or write into a caller-supplied in-place target. A
//! separate unit closure runs once on the input units and yields the
//! output unit.
//!
//! ## Design notes
//!
//! * **Dispatch is a match on the tag**: Callers that support several
//!   kinds (say double and float) match on the runtime kind and call the
//!   monomorphized instantiation for each; an unsupported kind is simply
//!   a miss in that match.
//! * **No promotion in place**: The in-place forms fix the output element
//!   type to the target's; only the fresh-output forms may change kinds.
//! * **Ordering**: Elements are produced in the output's lexicographic
//!   order, so accumulations and floating-point results are reproducible.
//!
//! ## Non-goals
//!
//! * Event-list (sparse) transforms: the fused kernels in the algorithms
//!   layer handle those.

// Internal dependencies
use crate::engine::validator::Validator;
use crate::primitives::{ArrayError, Dimensions, Unit};
use crate::storage::Element;
use crate::variable::Variable;
use crate::view::StridedLayout;

// ============================================================================
// Fresh-Output Transforms
// ============================================================================

/// Apply `op` to every element of `var`, producing a fresh Variable of
/// element type `R` with unit `unit_op(var.unit())`.
pub fn transform_unary<A, R>(
    var: &Variable,
    unit_op: impl Fn(Unit) -> Unit,
    op: impl Fn(&A) -> R,
) -> Result<Variable, ArrayError>
where
    A: Element,
    R: Element,
{
    Validator::not_sparse(var.dims())?;
    let input = var.values::<A>()?;
    let output: Vec<R> = input.iter().map(op).collect();
    Variable::new::<R>(unit_op(var.unit()), var.dims().clone(), output)
}

/// Apply `op` pairwise over `a` and `b` aligned to the wider shape,
/// producing a fresh Variable of element type `R`.
///
/// One operand's dims must contain the other's; the contained side
/// broadcasts. The unit closure may reject the unit combination.
pub fn transform_binary<A, B, R>(
    a: &Variable,
    b: &Variable,
    unit_op: impl Fn(Unit, Unit) -> Result<Unit, ArrayError>,
    op: impl Fn(&A, &B) -> R,
) -> Result<Variable, ArrayError>
where
    A: Element,
    B: Element,
    R: Element,
{
    Validator::not_sparse(a.dims())?;
    Validator::not_sparse(b.dims())?;
    let unit = unit_op(a.unit(), b.unit())?;
    let target = widest(a.dims(), b.dims())?;
    let layout_a = StridedLayout::new(target, a.dims(), a.dims(), 0)?;
    let layout_b = StridedLayout::new(target, b.dims(), b.dims(), 0)?;
    let av = a.values::<A>()?;
    let bv = b.values::<B>()?;
    let mut output: Vec<R> = Vec::with_capacity(layout_a.len());
    for (i, j) in layout_a.offsets().zip(layout_b.offsets()) {
        output.push(op(&av[i], &bv[j]));
    }
    Variable::new::<R>(unit, target.clone(), output)
}

// ============================================================================
// In-Place Transforms
// ============================================================================

/// Apply `op` to every element of `out` in place. The element type is
/// fixed by the target; no promotion.
pub fn transform_in_place<A>(out: &mut Variable, op: impl Fn(&mut A)) -> Result<(), ArrayError>
where
    A: Element,
{
    Validator::not_sparse(out.dims())?;
    for value in out.values_mut::<A>()? {
        op(value);
    }
    Ok(())
}

/// Apply `op(out_elem, other_elem)` pairwise in place, broadcasting
/// `other` over the target's shape. The target's element type is fixed;
/// no promotion.
pub fn transform_in_place_binary<A, B>(
    out: &mut Variable,
    other: &Variable,
    unit_op: impl Fn(Unit, Unit) -> Result<Unit, ArrayError>,
    op: impl Fn(&mut A, &B),
) -> Result<(), ArrayError>
where
    A: Element,
    B: Element,
{
    Validator::not_sparse(out.dims())?;
    Validator::not_sparse(other.dims())?;
    Validator::dims_contains(out.dims(), other.dims())?;
    let unit = unit_op(out.unit(), other.unit())?;
    let layout_out = StridedLayout::new(out.dims(), out.dims(), out.dims(), 0)?;
    let layout_other = StridedLayout::new(out.dims(), other.dims(), other.dims(), 0)?;
    {
        let bv = other.values::<B>()?;
        // Layouts are owned; the mutable borrow below is the only live one.
        let av = out.values_mut::<A>()?;
        for (i, j) in layout_out.offsets().zip(layout_other.offsets()) {
            op(&mut av[i], &bv[j]);
        }
    }
    out.set_unit(unit);
    Ok(())
}

// The containing shape of the two operands.
fn widest<'a>(a: &'a Dimensions, b: &'a Dimensions) -> Result<&'a Dimensions, ArrayError> {
    if a.contains_dims(b) {
        Ok(a)
    } else if b.contains_dims(a) {
        Ok(b)
    } else {
        Err(ArrayError::DimensionMismatch {
            expected: a.clone(),
            actual: b.clone(),
        })
    }
}
