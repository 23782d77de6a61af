//! Arithmetic on Variables and mutable views.
//!
//! ## Purpose
//!
//! The operator surface of the Variable type: in-place `+= -= *= /=` (and
//! `|=` for Bool masks), and the value-returning forms. Alignment over
//! dimension labels — broadcasting and transposition — happens in the
//! storage layer; this module enforces the unit and shape preconditions
//! first, so a failed operation performs no write.
//!
//! ## Design notes
//!
//! * **Fallible operators**: The value-returning `std::ops` impls produce
//!   `Result`, so `(&a + &b)?` reads naturally while every precondition
//!   violation stays an error rather than a panic.
//! * **Unit rules**: Addition, subtraction, and mask union require equal
//!   units; multiplication and division combine them. A partial view
//!   refuses a unit-changing operation.
//! * **Event lists**: `+=` on sparse kinds concatenates per row; the
//!   remaining operators are unsupported for event lists (the fused
//!   sparse/dense path lives in the algorithms layer).

// External dependencies
use core::ops::{Add, BitOr, Div, Mul, Sub};

// Internal dependencies
use crate::primitives::ArrayError;
use crate::storage::{self, BinOp, RawMut};
use crate::variable::variable::{Variable, VariableSliceMut};

// ============================================================================
// In-Place Operators on Variables
// ============================================================================

impl Variable {
    /// `self += other`, broadcasting `other` over missing dimensions.
    /// Event lists concatenate per row.
    pub fn add_assign(&mut self, other: &Variable) -> Result<(), ArrayError> {
        if self.unit != other.unit {
            return Err(ArrayError::UnitMismatch {
                expected: self.unit,
                actual: other.unit,
            });
        }
        if self.kind().is_sparse() && other.kind().is_sparse() {
            return storage::binary_in_place(self.raw_mut(), other.raw(), BinOp::Add);
        }
        self.require_contains(other)?;
        storage::binary_in_place(self.raw_mut(), other.raw(), BinOp::Add)
    }

    /// `self -= other`, broadcasting `other` over missing dimensions.
    pub fn sub_assign(&mut self, other: &Variable) -> Result<(), ArrayError> {
        if self.unit != other.unit {
            return Err(ArrayError::UnitMismatch {
                expected: self.unit,
                actual: other.unit,
            });
        }
        if self.kind().is_sparse() || other.kind().is_sparse() {
            return Err(ArrayError::SparseUnsupported {
                operation: "subtract",
            });
        }
        self.require_contains(other)?;
        storage::binary_in_place(self.raw_mut(), other.raw(), BinOp::Sub)
    }

    /// `self *= other`; the result unit is the product of the units.
    pub fn mul_assign(&mut self, other: &Variable) -> Result<(), ArrayError> {
        if self.kind().is_sparse() || other.kind().is_sparse() {
            return Err(ArrayError::SparseUnsupported {
                operation: "multiply",
            });
        }
        self.require_contains(other)?;
        storage::binary_in_place(self.raw_mut(), other.raw(), BinOp::Mul)?;
        self.unit = self.unit * other.unit;
        Ok(())
    }

    /// `self /= other`; the result unit is the quotient of the units.
    pub fn div_assign(&mut self, other: &Variable) -> Result<(), ArrayError> {
        if self.kind().is_sparse() || other.kind().is_sparse() {
            return Err(ArrayError::SparseUnsupported {
                operation: "divide",
            });
        }
        self.require_contains(other)?;
        storage::binary_in_place(self.raw_mut(), other.raw(), BinOp::Div)?;
        self.unit = self.unit / other.unit;
        Ok(())
    }

    /// `self |= other` for Bool masks.
    pub fn or_assign(&mut self, other: &Variable) -> Result<(), ArrayError> {
        if self.unit != other.unit {
            return Err(ArrayError::UnitMismatch {
                expected: self.unit,
                actual: other.unit,
            });
        }
        self.require_contains(other)?;
        storage::binary_in_place(self.raw_mut(), other.raw(), BinOp::Or)
    }

    fn require_contains(&self, other: &Variable) -> Result<(), ArrayError> {
        if self.dims.contains_dims(&other.dims) {
            Ok(())
        } else {
            Err(ArrayError::DimensionMismatch {
                expected: self.dims.clone(),
                actual: other.dims.clone(),
            })
        }
    }
}

// ============================================================================
// Value-Returning Operators
// ============================================================================

impl Add for &Variable {
    type Output = Result<Variable, ArrayError>;

    fn add(self, rhs: &Variable) -> Self::Output {
        let mut out = self.clone();
        out.add_assign(rhs)?;
        Ok(out)
    }
}

impl Sub for &Variable {
    type Output = Result<Variable, ArrayError>;

    fn sub(self, rhs: &Variable) -> Self::Output {
        let mut out = self.clone();
        out.sub_assign(rhs)?;
        Ok(out)
    }
}

impl Mul for &Variable {
    type Output = Result<Variable, ArrayError>;

    fn mul(self, rhs: &Variable) -> Self::Output {
        let mut out = self.clone();
        out.mul_assign(rhs)?;
        Ok(out)
    }
}

impl Div for &Variable {
    type Output = Result<Variable, ArrayError>;

    fn div(self, rhs: &Variable) -> Self::Output {
        let mut out = self.clone();
        out.div_assign(rhs)?;
        Ok(out)
    }
}

impl BitOr for &Variable {
    type Output = Result<Variable, ArrayError>;

    /// Mask union. The result takes the containing side's shape, so a
    /// rank-0 `false` seed ORs up to any mask shape.
    fn bitor(self, rhs: &Variable) -> Self::Output {
        if self.dims.contains_dims(&rhs.dims) {
            let mut out = self.clone();
            out.or_assign(rhs)?;
            Ok(out)
        } else if rhs.dims.contains_dims(&self.dims) {
            let mut out = rhs.clone();
            out.or_assign(self)?;
            Ok(out)
        } else {
            Err(ArrayError::DimensionMismatch {
                expected: self.dims.clone(),
                actual: rhs.dims.clone(),
            })
        }
    }
}

// ============================================================================
// In-Place Operators on Mutable Views
// ============================================================================

impl VariableSliceMut<'_> {
    /// `view += other` within the viewed region.
    pub fn add_assign(&mut self, other: &Variable) -> Result<(), ArrayError> {
        self.op_assign(other, BinOp::Add)
    }

    /// `view -= other` within the viewed region.
    pub fn sub_assign(&mut self, other: &Variable) -> Result<(), ArrayError> {
        self.op_assign(other, BinOp::Sub)
    }

    /// `view *= other`. Refused unless the view spans the whole variable,
    /// since the unit would change through a partial view.
    pub fn mul_assign(&mut self, other: &Variable) -> Result<(), ArrayError> {
        self.op_assign(other, BinOp::Mul)
    }

    /// `view /= other`. Same unit restriction as `mul_assign`.
    pub fn div_assign(&mut self, other: &Variable) -> Result<(), ArrayError> {
        self.op_assign(other, BinOp::Div)
    }

    /// `view |= other` for Bool masks.
    pub fn or_assign(&mut self, other: &Variable) -> Result<(), ArrayError> {
        self.op_assign(other, BinOp::Or)
    }

    fn op_assign(&mut self, other: &Variable, op: BinOp) -> Result<(), ArrayError> {
        let mut new_unit = self.unit();
        match op {
            BinOp::Add | BinOp::Sub | BinOp::Or => {
                if self.unit() != other.unit {
                    return Err(ArrayError::UnitMismatch {
                        expected: self.unit(),
                        actual: other.unit,
                    });
                }
            }
            BinOp::Mul => new_unit = self.unit() * other.unit,
            BinOp::Div => new_unit = self.unit() / other.unit,
        }
        if new_unit != self.unit() && !self.spans_whole() {
            return Err(ArrayError::UnitChangeOnSlice { unit: new_unit });
        }
        if !self.dims.contains_dims(&other.dims) {
            return Err(ArrayError::DimensionMismatch {
                expected: self.dims.clone(),
                actual: other.dims.clone(),
            });
        }
        let parent = &mut *self.parent;
        storage::binary_in_place(
            RawMut {
                storage: &mut parent.data,
                visible: &self.dims,
                parent: &parent.dims,
                base: self.base,
            },
            other.raw(),
            op,
        )?;
        self.parent.unit = new_unit;
        Ok(())
    }
}
