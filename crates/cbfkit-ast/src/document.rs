//! Problem document
//!
//! This module defines the in-memory form of a conic problem: the dimension
//! sections (scalar stacks and PSD blocks), integrality, and the seven
//! coefficient sections.

use serde::{Deserialize, Serialize};

use crate::cone::{Cone, ObjectiveSense};
use crate::coord::{
    ConstEntry, LinEntry, ObjLinEntry, ObjPsdEntry, PsdEntry, PsdMapConstEntry, PsdMapEntry,
};
use crate::stack::ConeStack;
use crate::MAX_SUPPORTED_VERSION;

/// A complete conic problem
///
/// All sequences keep the order in which entries were read or pushed.
/// Duplicate coordinates are allowed; how they combine is up to the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Format version
    pub version: u32,
    /// Objective sense
    pub sense: ObjectiveSense,
    /// Scalar constraint domains (`CON`)
    pub constraints: ConeStack,
    /// Scalar variable domains (`VAR`)
    pub variables: ConeStack,
    /// Integer-restricted variables (`INT`)
    pub integers: Vec<usize>,
    /// Dimensions of the PSD variables (`PSDVAR`)
    pub psd_variables: Vec<usize>,
    /// Dimensions of the PSD constraints (`PSDCON`)
    pub psd_constraints: Vec<usize>,
    /// `OBJFCOORD`
    pub obj_psd: Vec<ObjPsdEntry>,
    /// `OBJACOORD`
    pub obj_lin: Vec<ObjLinEntry>,
    /// `OBJBCOORD`
    pub obj_const: f64,
    /// `FCOORD`
    pub con_psd: Vec<PsdEntry>,
    /// `ACOORD`
    pub con_lin: Vec<LinEntry>,
    /// `BCOORD`
    pub con_const: Vec<ConstEntry>,
    /// `HCOORD`
    pub psdcon_lin: Vec<PsdMapEntry>,
    /// `DCOORD`
    pub psdcon_const: Vec<PsdMapConstEntry>,
}

/// Section sizes of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub version: u32,
    pub sense: ObjectiveSense,
    pub variables: usize,
    pub variable_blocks: usize,
    pub constraints: usize,
    pub constraint_blocks: usize,
    pub integers: usize,
    pub psd_variables: usize,
    pub psd_constraints: usize,
    pub obj_psd_nnz: usize,
    pub obj_lin_nnz: usize,
    pub con_psd_nnz: usize,
    pub con_lin_nnz: usize,
    pub con_const_nnz: usize,
    pub psdcon_lin_nnz: usize,
    pub psdcon_const_nnz: usize,
}

impl Document {
    /// Create an empty minimization problem at the newest supported version
    pub fn new() -> Self {
        Self::with_version(MAX_SUPPORTED_VERSION)
    }

    /// Create an empty minimization problem with an explicit version
    pub fn with_version(version: u32) -> Self {
        Self {
            version,
            sense: ObjectiveSense::Minimize,
            constraints: ConeStack::new(),
            variables: ConeStack::new(),
            integers: Vec::new(),
            psd_variables: Vec::new(),
            psd_constraints: Vec::new(),
            obj_psd: Vec::new(),
            obj_lin: Vec::new(),
            obj_const: 0.0,
            con_psd: Vec::new(),
            con_lin: Vec::new(),
            con_const: Vec::new(),
            psdcon_lin: Vec::new(),
            psdcon_const: Vec::new(),
        }
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn num_psd_variables(&self) -> usize {
        self.psd_variables.len()
    }

    pub fn num_psd_constraints(&self) -> usize {
        self.psd_constraints.len()
    }

    /// True if any variable is integer-restricted
    pub fn is_mixed_integer(&self) -> bool {
        !self.integers.is_empty()
    }

    /// True if any variable or constraint block is semidefinite
    pub fn has_psd(&self) -> bool {
        !self.psd_variables.is_empty() || !self.psd_constraints.is_empty()
    }

    /// Cones used anywhere in the scalar stacks, in first-use order
    pub fn cones_used(&self) -> Vec<Cone> {
        let mut cones = Vec::new();
        for block in self.variables.iter().chain(self.constraints.iter()) {
            if !cones.contains(&block.cone) {
                cones.push(block.cone);
            }
        }
        cones
    }

    pub fn summary(&self) -> Summary {
        Summary {
            version: self.version,
            sense: self.sense,
            variables: self.num_variables(),
            variable_blocks: self.variables.num_blocks(),
            constraints: self.num_constraints(),
            constraint_blocks: self.constraints.num_blocks(),
            integers: self.integers.len(),
            psd_variables: self.num_psd_variables(),
            psd_constraints: self.num_psd_constraints(),
            obj_psd_nnz: self.obj_psd.len(),
            obj_lin_nnz: self.obj_lin.len(),
            con_psd_nnz: self.con_psd.len(),
            con_lin_nnz: self.con_lin.len(),
            con_const_nnz: self.con_const.len(),
            psdcon_lin_nnz: self.psdcon_lin.len(),
            psdcon_const_nnz: self.psdcon_const.len(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
