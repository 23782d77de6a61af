//! Elementwise math on Variables.
//!
//! Each operation dispatches on the runtime element kind and runs through
//! the transform engine; an unsupported kind is a miss in the dispatch
//! match and surfaces as an error naming the kind.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::engine::transform::{transform_binary, transform_unary};
use crate::engine::validator::Validator;
use crate::primitives::{ArrayError, ElementKind, Unit};
use crate::storage::Element;
use crate::variable::Variable;

/// `1 / x` elementwise; the unit inverts.
pub fn reciprocal(var: &Variable) -> Result<Variable, ArrayError> {
    match var.kind() {
        ElementKind::Double => {
            transform_unary::<f64, f64>(var, |unit| Unit::dimensionless() / unit, |&x| 1.0 / x)
        }
        ElementKind::Float => {
            transform_unary::<f32, f32>(var, |unit| Unit::dimensionless() / unit, |&x| 1.0 / x)
        }
        kind => Err(ArrayError::KindNotSupported {
            operation: "take the reciprocal of",
            kind,
        }),
    }
}

/// `|x|` elementwise; the unit is unchanged.
pub fn abs(var: &Variable) -> Result<Variable, ArrayError> {
    match var.kind() {
        ElementKind::Double => transform_unary::<f64, f64>(var, |unit| unit, |&x| x.abs()),
        ElementKind::Float => transform_unary::<f32, f32>(var, |unit| unit, |&x| x.abs()),
        kind => Err(ArrayError::KindNotSupported {
            operation: "take the absolute value of",
            kind,
        }),
    }
}

/// `sqrt(x)` elementwise; the unit is unchanged.
pub fn sqrt(var: &Variable) -> Result<Variable, ArrayError> {
    match var.kind() {
        ElementKind::Double => transform_unary::<f64, f64>(var, |unit| unit, |&x| x.sqrt()),
        ElementKind::Float => transform_unary::<f32, f32>(var, |unit| unit, |&x| x.sqrt()),
        kind => Err(ArrayError::KindNotSupported {
            operation: "take the square root of",
            kind,
        }),
    }
}

/// Euclidean norm of each 3-vector; the unit is preserved.
pub fn norm(var: &Variable) -> Result<Variable, ArrayError> {
    match var.kind() {
        ElementKind::Vector3 => transform_unary::<[f64; 3], f64>(
            var,
            |unit| unit,
            |v| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt(),
        ),
        kind => Err(ArrayError::KindNotSupported {
            operation: "take the norm of",
            kind,
        }),
    }
}

/// Dot product of two 3-vector Variables; units multiply.
pub fn dot(a: &Variable, b: &Variable) -> Result<Variable, ArrayError> {
    transform_binary::<[f64; 3], [f64; 3], f64>(
        a,
        b,
        |unit_a, unit_b| Ok(unit_a * unit_b),
        |x, y| x[0] * y[0] + x[1] * y[1] + x[2] * y[2],
    )
}

/// Replace NaN values by `replacement`. The replacement's type must match
/// the input's element kind; the unit is unchanged.
pub fn replace_nan<T>(var: &Variable, replacement: T) -> Result<Variable, ArrayError>
where
    T: Element + Float,
{
    Validator::kind_equals(var.kind(), T::KIND)?;
    transform_unary::<T, T>(
        var,
        |unit| unit,
        move |&x| if x.is_nan() { replacement } else { x },
    )
}
