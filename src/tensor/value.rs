// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use rand::Rng;

use crate::tensor::{ElementType, TensorError};

/// Flattened, typed element storage for a [`TensorValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
}

impl TensorData {
    pub fn len(&self) -> usize {
        match self {
            TensorData::I8(v) => v.len(),
            TensorData::I16(v) => v.len(),
            TensorData::I32(v) => v.len(),
            TensorData::I64(v) => v.len(),
            TensorData::U8(v) => v.len(),
            TensorData::F32(v) => v.len(),
            TensorData::F64(v) => v.len(),
            TensorData::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            TensorData::I8(_) => ElementType::I8,
            TensorData::I16(_) => ElementType::I16,
            TensorData::I32(_) => ElementType::I32,
            TensorData::I64(_) => ElementType::I64,
            TensorData::U8(_) => ElementType::U8,
            TensorData::F32(_) => ElementType::F32,
            TensorData::F64(_) => ElementType::F64,
            TensorData::Bool(_) => ElementType::Bool,
        }
    }
}

/// A shape plus flattened element storage: the single value representation
/// every backend call normalizes to.
///
/// A rank-0 value holds exactly one element (the product over an empty
/// dimension list).
#[derive(Debug, Clone, PartialEq)]
pub struct TensorValue {
    shape: Vec<usize>,
    data: TensorData,
}

impl TensorValue {
    /// Build a value, checking that the shape and storage agree on the
    /// element count.
    pub fn new(shape: Vec<usize>, data: TensorData) -> Result<Self, TensorError> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(TensorError::ElementCountMismatch {
                shape,
                expected,
                found: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// A rank-1 value covering the whole storage vector.
    pub fn vector(data: TensorData) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// A rank-0 f32 value.
    pub fn scalar_f32(value: f32) -> Self {
        Self {
            shape: vec![],
            data: TensorData::F32(vec![value]),
        }
    }

    /// A rank-0 i32 value.
    pub fn scalar_i32(value: i32) -> Self {
        Self {
            shape: vec![],
            data: TensorData::I32(vec![value]),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    pub fn element_count(&self) -> usize {
        self.data.len()
    }

    /// Elementwise comparison for cross-backend checks.
    ///
    /// Shapes and element types must match exactly. Integer and bool values
    /// compare exactly; float values compare within `atol + rtol * |other|`.
    pub fn allclose(&self, other: &TensorValue, rtol: f64, atol: f64) -> bool {
        if self.shape != other.shape || self.element_type() != other.element_type() {
            return false;
        }
        match (&self.data, &other.data) {
            (TensorData::F32(a), TensorData::F32(b)) => a
                .iter()
                .zip(b)
                .all(|(x, y)| close(*x as f64, *y as f64, rtol, atol)),
            (TensorData::F64(a), TensorData::F64(b)) => {
                a.iter().zip(b).all(|(x, y)| close(*x, *y, rtol, atol))
            }
            _ => self.data == other.data,
        }
    }

    /// Generate a random value for test inputs, driven by an explicit rng
    /// handle (see [`crate::random::RandomSources`]).
    ///
    /// Floats draw from `[0, 1)`, integers from `[0, 100)`, bools are fair
    /// coin flips.
    pub fn random_uniform<R: Rng>(
        shape: Vec<usize>,
        element_type: ElementType,
        rng: &mut R,
    ) -> Self {
        let n: usize = shape.iter().product();
        let data = match element_type {
            ElementType::I8 => TensorData::I8((0..n).map(|_| rng.gen_range(0..100)).collect()),
            ElementType::I16 => TensorData::I16((0..n).map(|_| rng.gen_range(0..100)).collect()),
            ElementType::I32 => TensorData::I32((0..n).map(|_| rng.gen_range(0..100)).collect()),
            ElementType::I64 => TensorData::I64((0..n).map(|_| rng.gen_range(0..100)).collect()),
            ElementType::U8 => TensorData::U8((0..n).map(|_| rng.gen_range(0..100)).collect()),
            ElementType::F32 => TensorData::F32((0..n).map(|_| rng.gen::<f32>()).collect()),
            ElementType::F64 => TensorData::F64((0..n).map(|_| rng.gen::<f64>()).collect()),
            ElementType::Bool => TensorData::Bool((0..n).map(|_| rng.gen_bool(0.5)).collect()),
        };
        Self { shape, data }
    }
}

fn close(a: f64, b: f64, rtol: f64, atol: f64) -> bool {
    if a == b {
        // Covers infinities of equal sign.
        return true;
    }
    (a - b).abs() <= atol + rtol * b.abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_checks_element_count() {
        let ok = TensorValue::new(vec![2, 3], TensorData::F32(vec![0.0; 6]));
        assert!(ok.is_ok());

        let err = TensorValue::new(vec![2, 3], TensorData::F32(vec![0.0; 9])).unwrap_err();
        assert!(matches!(
            err,
            TensorError::ElementCountMismatch {
                expected: 6,
                found: 9,
                ..
            }
        ));
    }

    #[test]
    fn test_rank_zero_holds_one_element() {
        let v = TensorValue::scalar_f32(42.0);
        assert_eq!(v.shape(), &[] as &[usize]);
        assert_eq!(v.element_count(), 1);
    }

    #[test]
    fn test_allclose_tolerances() {
        let a = TensorValue::vector(TensorData::F32(vec![1.0, 2.0]));
        let b = TensorValue::vector(TensorData::F32(vec![1.0 + 1e-6, 2.0]));
        assert!(a.allclose(&b, 1e-4, 1e-4));
        assert!(!a.allclose(&b, 0.0, 0.0));
    }

    #[test]
    fn test_allclose_rejects_shape_and_type_mismatch() {
        let flat = TensorValue::vector(TensorData::F32(vec![1.0, 2.0]));
        let square = TensorValue::new(vec![2, 1], TensorData::F32(vec![1.0, 2.0])).unwrap();
        assert!(!flat.allclose(&square, 1e-4, 1e-4));

        let ints = TensorValue::vector(TensorData::I32(vec![1, 2]));
        assert!(!flat.allclose(&ints, 1e-4, 1e-4));
    }

    #[test]
    fn test_integers_compare_exactly() {
        let a = TensorValue::vector(TensorData::I32(vec![1, 2, 3]));
        let b = TensorValue::vector(TensorData::I32(vec![1, 2, 3]));
        let c = TensorValue::vector(TensorData::I32(vec![1, 2, 4]));
        assert!(a.allclose(&b, 0.0, 0.0));
        assert!(!a.allclose(&c, 1.0, 1.0));
    }

    #[test]
    fn test_random_uniform_is_seed_deterministic() {
        let mut r1 = StdRng::seed_from_u64(7);
        let mut r2 = StdRng::seed_from_u64(7);
        let a = TensorValue::random_uniform(vec![4, 4], ElementType::F32, &mut r1);
        let b = TensorValue::random_uniform(vec![4, 4], ElementType::F32, &mut r2);
        assert_eq!(a, b);
        assert_eq!(a.shape(), &[4, 4]);
        assert_eq!(a.element_count(), 16);
    }
}
