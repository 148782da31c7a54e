//! Index bounds derived from the dimension sections of a document
//!
//! Every coordinate section indexes into counts declared by other sections
//! (scalar variables, scalar constraints, PSD blocks and their dimensions).
//! [`Bounds`] answers "is this index valid against what is known so far",
//! which is exactly the question the reader asks row by row while the
//! document is still being filled in.

use thiserror::Error;

use crate::document::Document;

/// An index that falls outside the range established by another section
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} index {index} out of range (expected 0 <= index < {bound})")]
pub struct BoundsViolation {
    /// What the index refers to, e.g. "variable" or "psdvar row"
    pub field: &'static str,
    pub index: i64,
    pub bound: usize,
}

/// Read-only bounds view over a (possibly partially populated) document
#[derive(Debug, Clone, Copy)]
pub struct Bounds<'a> {
    doc: &'a Document,
}

fn check(field: &'static str, index: i64, bound: usize) -> Result<usize, BoundsViolation> {
    match usize::try_from(index) {
        Ok(i) if i < bound => Ok(i),
        _ => Err(BoundsViolation {
            field,
            index,
            bound,
        }),
    }
}

impl<'a> Bounds<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }

    /// Scalar variable index
    pub fn var(&self, index: i64) -> Result<usize, BoundsViolation> {
        check("variable", index, self.doc.num_variables())
    }

    /// Scalar constraint index
    pub fn con(&self, index: i64) -> Result<usize, BoundsViolation> {
        check("constraint", index, self.doc.num_constraints())
    }

    /// PSD variable index
    pub fn psdvar(&self, index: i64) -> Result<usize, BoundsViolation> {
        check("psdvar", index, self.doc.num_psd_variables())
    }

    /// PSD constraint index
    pub fn psdcon(&self, index: i64) -> Result<usize, BoundsViolation> {
        check("psdcon", index, self.doc.num_psd_constraints())
    }

    /// Row and column of an entry inside PSD variable `psdvar`.
    /// `psdvar` must already have passed [`Bounds::psdvar`].
    pub fn psdvar_entry(
        &self,
        psdvar: usize,
        row: i64,
        col: i64,
    ) -> Result<(usize, usize), BoundsViolation> {
        let dim = self.doc.psd_variables[psdvar];
        Ok((check("psdvar row", row, dim)?, check("psdvar column", col, dim)?))
    }

    /// Row and column of an entry inside PSD constraint `psdcon`.
    /// `psdcon` must already have passed [`Bounds::psdcon`].
    pub fn psdcon_entry(
        &self,
        psdcon: usize,
        row: i64,
        col: i64,
    ) -> Result<(usize, usize), BoundsViolation> {
        let dim = self.doc.psd_constraints[psdcon];
        Ok((check("psdcon row", row, dim)?, check("psdcon column", col, dim)?))
    }
}

fn signed(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

impl Document {
    /// Bounds view over the dimension sections of this document
    pub fn bounds(&self) -> Bounds<'_> {
        Bounds::new(self)
    }

    /// Check every index of every coordinate section against the dimension
    /// sections. Documents produced by the reader always pass; hand-built
    /// documents should be validated before they are written out.
    pub fn validate(&self) -> Result<(), BoundsViolation> {
        let b = self.bounds();

        for &v in &self.integers {
            b.var(signed(v))?;
        }
        for e in &self.obj_psd {
            let j = b.psdvar(signed(e.psdvar))?;
            b.psdvar_entry(j, signed(e.row), signed(e.col))?;
        }
        for e in &self.obj_lin {
            b.var(signed(e.var))?;
        }
        for e in &self.con_psd {
            b.con(signed(e.con))?;
            let j = b.psdvar(signed(e.psdvar))?;
            b.psdvar_entry(j, signed(e.row), signed(e.col))?;
        }
        for e in &self.con_lin {
            b.con(signed(e.con))?;
            b.var(signed(e.var))?;
        }
        for e in &self.con_const {
            b.con(signed(e.con))?;
        }
        for e in &self.psdcon_lin {
            let i = b.psdcon(signed(e.psdcon))?;
            b.var(signed(e.var))?;
            b.psdcon_entry(i, signed(e.row), signed(e.col))?;
        }
        for e in &self.psdcon_const {
            let i = b.psdcon(signed(e.psdcon))?;
            b.psdcon_entry(i, signed(e.row), signed(e.col))?;
        }

        Ok(())
    }
}
