//! Host-side argument and result values.
//!
//! Arrays are stored column-major, so element `(row, col)` lives at
//! `col * rows + row`.

use crate::Sample;
use crate::error::{BridgeError, Result};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Double(Vec<f64>),
    Single(Vec<f32>),
    Logical(Vec<bool>),
    Complex { re: Vec<f64>, im: Vec<f64> },
}

impl ArrayData {
    pub fn len(&self) -> usize {
        match self {
            Self::Double(v) => v.len(),
            Self::Single(v) => v.len(),
            Self::Logical(v) => v.len(),
            Self::Complex { re, .. } => re.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Double(_) => "double",
            Self::Single(_) => "single",
            Self::Logical(_) => "logical",
            Self::Complex { .. } => "complex",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    rows: usize,
    cols: usize,
    data: ArrayData,
}

impl Array {
    pub fn new(rows: usize, cols: usize, data: ArrayData) -> Result<Self> {
        if let ArrayData::Complex { re, im } = &data {
            if re.len() != im.len() {
                return Err(BridgeError::usage(
                    "Real and imaginary parts must have the same length",
                ));
            }
        }
        if data.len() != rows * cols {
            return Err(BridgeError::usage(format!(
                "A {}x{} array needs {} elements, got {}",
                rows,
                cols,
                rows * cols,
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    pub fn scalar(value: f64) -> Self {
        Self {
            rows: 1,
            cols: 1,
            data: ArrayData::Double(vec![value]),
        }
    }

    pub fn double(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self> {
        Self::new(rows, cols, ArrayData::Double(values))
    }

    pub fn single(rows: usize, cols: usize, values: Vec<f32>) -> Result<Self> {
        Self::new(rows, cols, ArrayData::Single(values))
    }

    pub fn logical(rows: usize, cols: usize, values: Vec<bool>) -> Result<Self> {
        Self::new(rows, cols, ArrayData::Logical(values))
    }

    /// 1×N double row vector.
    pub fn row(values: Vec<f64>) -> Self {
        Self {
            rows: 1,
            cols: values.len(),
            data: ArrayData::Double(values),
        }
    }

    /// 1×N logical row vector.
    pub fn logical_row(values: Vec<bool>) -> Self {
        Self {
            rows: 1,
            cols: values.len(),
            data: ArrayData::Logical(values),
        }
    }

    /// Build a double matrix from row-major nested rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let row_count = rows.len();
        let col_count = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.iter().any(|r| r.as_ref().len() != col_count) {
            return Err(BridgeError::usage("All rows must have the same length"));
        }

        let mut values = Vec::with_capacity(row_count * col_count);
        for col in 0..col_count {
            for row in rows {
                values.push(row.as_ref()[col]);
            }
        }
        Self::double(row_count, col_count, values)
    }

    /// Array of the compiled sample type, as accepted by `process`.
    pub fn from_samples(rows: usize, cols: usize, samples: Vec<Sample>) -> Result<Self> {
        Self::new(rows, cols, sample_data(samples))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn is_real(&self) -> bool {
        !matches!(self.data, ArrayData::Complex { .. })
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self.data, ArrayData::Logical(_))
    }

    pub fn is_logical(&self) -> bool {
        matches!(self.data, ArrayData::Logical(_))
    }

    /// Real numeric contents widened to `f64`; `None` for logical or complex data.
    pub fn real_values(&self) -> Option<Vec<f64>> {
        match &self.data {
            ArrayData::Double(v) => Some(v.clone()),
            ArrayData::Single(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
            _ => None,
        }
    }

    pub fn logicals(&self) -> Option<&[bool]> {
        match &self.data {
            ArrayData::Logical(v) => Some(v),
            _ => None,
        }
    }

    /// Samples in the compiled precision; `None` for any other element type.
    pub fn samples(&self) -> Option<&[Sample]> {
        samples_of(&self.data)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let index = col * self.rows + row;
        match &self.data {
            ArrayData::Double(v) => Some(v[index]),
            ArrayData::Single(v) => Some(f64::from(v[index])),
            ArrayData::Logical(v) => Some(if v[index] { 1.0 } else { 0.0 }),
            ArrayData::Complex { re, .. } => Some(re[index]),
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        if self.rows == 1 && self.cols == 1 && self.is_real() && self.is_numeric() {
            self.get(0, 0)
        } else {
            None
        }
    }

    /// Non-negative whole-number scalar, e.g. a source count.
    pub fn as_count(&self) -> Option<usize> {
        self.as_scalar()
            .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
            .map(|v| v as usize)
    }
}

#[cfg(not(feature = "double-precision"))]
fn sample_data(samples: Vec<Sample>) -> ArrayData {
    ArrayData::Single(samples)
}

#[cfg(feature = "double-precision")]
fn sample_data(samples: Vec<Sample>) -> ArrayData {
    ArrayData::Double(samples)
}

#[cfg(not(feature = "double-precision"))]
fn samples_of(data: &ArrayData) -> Option<&[Sample]> {
    match data {
        ArrayData::Single(v) => Some(v),
        _ => None,
    }
}

#[cfg(feature = "double-precision")]
fn samples_of(data: &ArrayData) -> Option<&[Sample]> {
    match data {
        ArrayData::Double(v) => Some(v),
        _ => None,
    }
}

/// One positional argument of a protocol call.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Text(String),
    Array(Array),
    Struct(BTreeMap<String, String>),
}

impl Arg {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Array(a) => a.data.class_name(),
            Self::Struct(_) => "struct",
        }
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Array> for Arg {
    fn from(a: Array) -> Self {
        Self::Array(a)
    }
}

impl From<BTreeMap<String, String>> for Arg {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self::Struct(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_is_column_major() {
        let m = Array::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(
            m.data(),
            &ArrayData::Double(vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0])
        );
        assert_eq!(m.get(1, 2), Some(6.0));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(Array::from_rows(&rows).is_err());
    }

    #[test]
    fn test_element_count_checked() {
        assert!(Array::double(2, 2, vec![1.0; 3]).is_err());
        assert!(Array::logical(1, 2, vec![true, false]).is_ok());
    }

    #[test]
    fn test_count_requires_whole_non_negative_scalar() {
        assert_eq!(Array::scalar(4.0).as_count(), Some(4));
        assert_eq!(Array::scalar(0.0).as_count(), Some(0));
        assert_eq!(Array::scalar(2.5).as_count(), None);
        assert_eq!(Array::scalar(-1.0).as_count(), None);
        assert_eq!(Array::row(vec![1.0, 2.0]).as_count(), None);
        assert_eq!(Array::logical_row(vec![true]).as_count(), None);
    }

    #[test]
    fn test_real_values_widen_single() {
        let a = Array::single(1, 2, vec![0.5, -1.0]).unwrap();
        assert_eq!(a.real_values(), Some(vec![0.5, -1.0]));
        assert!(Array::logical_row(vec![true]).real_values().is_none());

        let c = Array::new(
            1,
            1,
            ArrayData::Complex {
                re: vec![1.0],
                im: vec![2.0],
            },
        )
        .unwrap();
        assert!(!c.is_real());
        assert!(c.real_values().is_none());
    }

    #[test]
    fn test_samples_match_compiled_precision() {
        let block = Array::from_samples(2, 1, vec![0.25, 0.5]).unwrap();
        assert_eq!(block.samples(), Some(&[0.25 as Sample, 0.5][..]));

        #[cfg(not(feature = "double-precision"))]
        let other = Array::double(1, 1, vec![0.0]).unwrap();
        #[cfg(feature = "double-precision")]
        let other = Array::single(1, 1, vec![0.0]).unwrap();
        assert!(other.samples().is_none());
    }

    #[test]
    fn test_arg_accessors() {
        let text = Arg::from("init");
        assert_eq!(text.as_text(), Some("init"));
        assert!(text.as_array().is_none());
        assert_eq!(Arg::from(Array::scalar(1.0)).kind(), "double");
        assert_eq!(Arg::from(BTreeMap::new()).kind(), "struct");
    }
}
