//! Sparse coefficient entries
//!
//! One record type per coordinate section. Field names follow the role of the
//! index rather than its column position: `con` is a scalar constraint row,
//! `var` a scalar variable, `psdvar`/`psdcon` a PSD block, and `row`/`col`
//! address an entry inside that block.

use serde::{Deserialize, Serialize};

/// Objective coefficient on a PSD variable entry (`OBJFCOORD`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjPsdEntry {
    pub psdvar: usize,
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

/// Objective coefficient on a scalar variable (`OBJACOORD`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjLinEntry {
    pub var: usize,
    pub value: f64,
}

/// Constraint coefficient on a PSD variable entry (`FCOORD`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsdEntry {
    pub con: usize,
    pub psdvar: usize,
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

/// Constraint coefficient on a scalar variable (`ACOORD`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinEntry {
    pub con: usize,
    pub var: usize,
    pub value: f64,
}

/// Constant term of a scalar constraint (`BCOORD`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstEntry {
    pub con: usize,
    pub value: f64,
}

/// Scalar variable coefficient inside a PSD constraint (`HCOORD`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsdMapEntry {
    pub psdcon: usize,
    pub var: usize,
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

/// Constant term inside a PSD constraint (`DCOORD`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsdMapConstEntry {
    pub psdcon: usize,
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

impl ObjPsdEntry {
    pub fn new(psdvar: usize, row: usize, col: usize, value: f64) -> Self {
        Self { psdvar, row, col, value }
    }
}

impl ObjLinEntry {
    pub fn new(var: usize, value: f64) -> Self {
        Self { var, value }
    }
}

impl PsdEntry {
    pub fn new(con: usize, psdvar: usize, row: usize, col: usize, value: f64) -> Self {
        Self { con, psdvar, row, col, value }
    }
}

impl LinEntry {
    pub fn new(con: usize, var: usize, value: f64) -> Self {
        Self { con, var, value }
    }
}

impl ConstEntry {
    pub fn new(con: usize, value: f64) -> Self {
        Self { con, value }
    }
}

impl PsdMapEntry {
    pub fn new(psdcon: usize, var: usize, row: usize, col: usize, value: f64) -> Self {
        Self { psdcon, var, row, col, value }
    }
}

impl PsdMapConstEntry {
    pub fn new(psdcon: usize, row: usize, col: usize, value: f64) -> Self {
        Self { psdcon, row, col, value }
    }
}
