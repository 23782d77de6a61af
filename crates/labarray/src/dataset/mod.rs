//! Role-keyed aggregation of Variables.
//!
//! ## Purpose
//!
//! A [`Dataset`] groups Variables by role — coordinates, labels, data,
//! masks, and attributes — under names. Coordinates are keyed by the
//! dimension label they describe and participate in alignment checks when
//! two datasets are combined arithmetically; masks are OR-combined.
//!
//! ## Design notes
//!
//! * **Interface-level**: The aggregation logic here is the surface the
//!   array engine exposes to dataset consumers; richer dataset semantics
//!   (bin-edge awareness, coordinate propagation across operations) live
//!   outside the core.
//! * **Value semantics**: Datasets nest inside Variables by value; no
//!   cycles can form.
//!
//! ## Invariants
//!
//! * Arithmetic between datasets requires the right-hand side's
//!   coordinates and labels to be present and equal on the left.
//! * Masks never cancel: combining datasets unions them.

// External dependencies
use core::fmt::{Display, Formatter, Result as FmtResult};
use std::collections::BTreeMap;

// Internal dependencies
use crate::primitives::{ArrayError, Dim};
use crate::variable::Variable;

// ============================================================================
// Role
// ============================================================================

/// The role a Variable plays within a Dataset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Coordinate axes, keyed by dimension label.
    Coord,
    /// Auxiliary per-axis labels.
    Label,
    /// The data items themselves.
    Data,
    /// Boolean masks, OR-combined on arithmetic.
    Mask,
    /// Free-form attributes, ignored by arithmetic.
    Attr,
}

impl Role {
    /// Human-readable role name.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Role::Coord => "coord",
            Role::Label => "label",
            Role::Data => "data",
            Role::Mask => "mask",
            Role::Attr => "attr",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// A mapping from `(role, name)` to Variable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    items: BTreeMap<(Role, String), Variable>,
}

// The binary operations datasets propagate to their data items.
#[derive(Copy, Clone, PartialEq)]
enum DataOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Number of items across all roles.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no items are present.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert an item under an explicit role and name.
    pub fn insert(&mut self, role: Role, name: &str, var: Variable) {
        self.items.insert((role, name.to_string()), var);
    }

    /// Look up an item by role and name.
    pub fn get(&self, role: Role, name: &str) -> Option<&Variable> {
        self.items.get(&(role, name.to_string()))
    }

    /// Iterate all items as `(role, name, variable)`.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &str, &Variable)> {
        self.items
            .iter()
            .map(|((role, name), var)| (*role, name.as_str(), var))
    }

    // ========================================================================
    // Role-Specific Accessors
    // ========================================================================

    /// Set the coordinate for a dimension label.
    pub fn set_coord(&mut self, dim: Dim, var: Variable) {
        self.insert(Role::Coord, dim.name(), var);
    }

    /// The coordinate for a dimension label.
    pub fn coord(&self, dim: Dim) -> Option<&Variable> {
        self.get(Role::Coord, dim.name())
    }

    /// Set a data item.
    pub fn set_data(&mut self, name: &str, var: Variable) {
        self.insert(Role::Data, name, var);
    }

    /// A data item by name.
    pub fn data(&self, name: &str) -> Option<&Variable> {
        self.get(Role::Data, name)
    }

    /// Set an auxiliary label.
    pub fn set_label(&mut self, name: &str, var: Variable) {
        self.insert(Role::Label, name, var);
    }

    /// An auxiliary label by name.
    pub fn label(&self, name: &str) -> Option<&Variable> {
        self.get(Role::Label, name)
    }

    /// Set a mask.
    pub fn set_mask(&mut self, name: &str, var: Variable) {
        self.insert(Role::Mask, name, var);
    }

    /// A mask by name.
    pub fn mask(&self, name: &str) -> Option<&Variable> {
        self.get(Role::Mask, name)
    }

    /// Set an attribute.
    pub fn set_attr(&mut self, name: &str, var: Variable) {
        self.insert(Role::Attr, name, var);
    }

    /// An attribute by name.
    pub fn attr(&self, name: &str) -> Option<&Variable> {
        self.get(Role::Attr, name)
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// Add `other`'s data items to the same-named items here.
    pub fn add_assign(&mut self, other: &Dataset) -> Result<(), ArrayError> {
        self.op_assign(other, DataOp::Add)
    }

    /// Subtract `other`'s data items from the same-named items here.
    pub fn sub_assign(&mut self, other: &Dataset) -> Result<(), ArrayError> {
        self.op_assign(other, DataOp::Sub)
    }

    /// Multiply the same-named data items by `other`'s.
    pub fn mul_assign(&mut self, other: &Dataset) -> Result<(), ArrayError> {
        self.op_assign(other, DataOp::Mul)
    }

    /// Divide the same-named data items by `other`'s.
    pub fn div_assign(&mut self, other: &Dataset) -> Result<(), ArrayError> {
        self.op_assign(other, DataOp::Div)
    }

    fn op_assign(&mut self, other: &Dataset, op: DataOp) -> Result<(), ArrayError> {
        // Coordinates and labels of the right-hand side must be present
        // and equal here, checked before any write.
        for ((role, name), var) in &other.items {
            if matches!(role, Role::Coord | Role::Label) {
                match self.items.get(&(*role, name.clone())) {
                    Some(mine) if mine == var => {}
                    _ => return Err(ArrayError::CoordMismatch { name: name.clone() }),
                }
            }
        }
        // Every data item here needs a counterpart there.
        let names: Vec<String> = self
            .items
            .keys()
            .filter(|(role, _)| *role == Role::Data)
            .map(|(_, name)| name.clone())
            .collect();
        for name in &names {
            if other.data(name).is_none() {
                return Err(ArrayError::ItemNotFound { name: name.clone() });
            }
        }

        // Masks union.
        for ((role, name), var) in &other.items {
            if *role == Role::Mask {
                match self.items.get_mut(&(Role::Mask, name.clone())) {
                    Some(mine) => {
                        let merged = (&*mine | var)?;
                        *mine = merged;
                    }
                    None => {
                        self.items.insert((Role::Mask, name.clone()), var.clone());
                    }
                }
            }
        }

        // Data items operate pairwise by name.
        for name in names {
            let rhs = other.data(&name).cloned();
            if let (Some(lhs), Some(rhs)) =
                (self.items.get_mut(&(Role::Data, name)), rhs)
            {
                match op {
                    DataOp::Add => lhs.add_assign(&rhs)?,
                    DataOp::Sub => lhs.sub_assign(&rhs)?,
                    DataOp::Mul => lhs.mul_assign(&rhs)?,
                    DataOp::Div => lhs.div_assign(&rhs)?,
                }
            }
        }
        Ok(())
    }
}
