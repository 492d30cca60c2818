use cgmath::InnerSpace;

pub trait Scalar {
    fn into(self) -> Vec<f32>;
}

impl Scalar for Vec<f32> {
    fn into(self) -> Vec<f32> {
        self
    }
}

impl Scalar for Vec<f64> {
    fn into(self) -> Vec<f32> {
        self.into_iter().map(|f| f as f32).collect()
    }
}

impl Scalar for &[f32] {
    fn into(self) -> Vec<f32> {
        self.to_vec()
    }
}

#[cfg(feature = "ndarray")]
impl Scalar for ndarray::Array1<f32> {
    fn into(self) -> Vec<f32> {
        self.into_raw_vec()
    }
}

#[cfg(feature = "ndarray")]
impl Scalar for ndarray::Array1<f64> {
    fn into(self) -> Vec<f32> {
        self.into_raw_vec().into_iter().map(|f| f as f32).collect()
    }
}

#[cfg(feature = "nalgebra")]
impl Scalar for nalgebra::base::DVector<f32> {
    fn into(self) -> Vec<f32> {
        self.row_iter().map(|row| row[0]).collect()
    }
}

/// Per-element 3-vectors: directions, displacements, or RGB-like triples.
pub trait Vectors {
    fn into(self) -> Vec<[f32; 3]>;
}

impl Vectors for Vec<[f32; 3]> {
    fn into(self) -> Vec<[f32; 3]> {
        self
    }
}

impl Vectors for &[[f32; 3]] {
    fn into(self) -> Vec<[f32; 3]> {
        self.to_vec()
    }
}

#[cfg(feature = "ndarray")]
impl Vectors for ndarray::Array2<f32> {
    fn into(self) -> Vec<[f32; 3]> {
        self.rows()
            .into_iter()
            .map(|row| [row[0], row[1], row[2]])
            .collect()
    }
}

#[cfg(feature = "ndarray")]
impl Vectors for ndarray::Array2<f64> {
    fn into(self) -> Vec<[f32; 3]> {
        self.rows()
            .into_iter()
            .map(|row| [row[0] as f32, row[1] as f32, row[2] as f32])
            .collect()
    }
}

#[cfg(feature = "nalgebra")]
impl Vectors for nalgebra::base::MatrixXx3<f32> {
    fn into(self) -> Vec<[f32; 3]> {
        self.row_iter()
            .map(|row| [row[0], row[1], row[2]])
            .collect()
    }
}

/// Euclidean length of every vector.
pub fn magnitudes(vectors: &[[f32; 3]]) -> Vec<f32> {
    vectors
        .iter()
        .map(|v| cgmath::Vector3::from(*v).magnitude())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_lengths() {
        assert_eq!(magnitudes(&[[3., 4., 0.], [0., 0., -2.]]), vec![5., 2.]);
    }

    #[test]
    fn scalar_widening() {
        let values = Scalar::into(vec![0.5_f64, 2.]);
        assert_eq!(values, vec![0.5_f32, 2.]);
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn ndarray_inputs() {
        let scalars = Scalar::into(ndarray::arr1(&[1.5_f64, -2.]));
        assert_eq!(scalars, vec![1.5_f32, -2.]);
        assert_eq!(Scalar::into(ndarray::arr1(&[0.25_f32])), vec![0.25]);
        let vectors = Vectors::into(ndarray::arr2(&[[1_f32, 2., 3.], [4., 5., 6.]]));
        assert_eq!(vectors, vec![[1., 2., 3.], [4., 5., 6.]]);
        let wide = Vectors::into(ndarray::arr2(&[[0.5_f64, 0., -1.]]));
        assert_eq!(wide, vec![[0.5_f32, 0., -1.]]);
    }

    #[cfg(feature = "nalgebra")]
    #[test]
    fn nalgebra_inputs() {
        let scalars = Scalar::into(nalgebra::DVector::from_vec(vec![3_f32, 1.]));
        assert_eq!(scalars, vec![3., 1.]);
        let matrix = nalgebra::MatrixXx3::<f32>::from_row_slice(&[1., 2., 3., 4., 5., 6.]);
        assert_eq!(Vectors::into(matrix), vec![[1., 2., 3.], [4., 5., 6.]]);
    }
}
