
use crate::{FaqError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the vector at insertion time
    pub index: usize,
    /// Squared Euclidean distance to the query
    pub distance: f32,
}

/// Exact nearest-neighbor index over fixed-dimension vectors.
///
/// Search is a linear scan by squared L2 distance. Results are ordered by
/// ascending distance; equal distances keep insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatL2Index {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatL2Index {
    #[inline]
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(FaqError::Index("Vector dimension must be positive".to_string()));
        }
        Ok(Self {
            dimension,
            vectors: Vec::new(),
        })
    }

    /// Build an index from vectors, taking the dimension from the first one
    #[inline]
    pub fn from_vectors(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dimension = vectors.first().map_or(0, Vec::len);
        let mut index = Self::new(dimension)?;
        for vector in vectors {
            index.add(vector)?;
        }
        Ok(index)
    }

    /// Append a vector and return its index
    #[inline]
    pub fn add(&mut self, vector: Vec<f32>) -> Result<usize> {
        self.check_dimension(&vector)?;
        self.vectors.push(vector);
        Ok(self.vectors.len() - 1)
    }

    /// The `k` closest vectors to `query`
    #[inline]
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        self.check_dimension(query)?;

        let mut neighbors: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, vector)| Neighbor {
                index,
                distance: squared_l2(vector, query),
            })
            .collect();

        // Stable sort keeps the first inserted vector ahead on ties
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);
        Ok(neighbors)
    }

    #[inline]
    pub fn nearest(&self, query: &[f32]) -> Result<Option<Neighbor>> {
        Ok(self.search(query, 1)?.into_iter().next())
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        if vector.len() == self.dimension {
            Ok(())
        } else {
            Err(FaqError::Index(format!(
                "Vector dimension mismatch: expected {}, got {}",
                self.dimension,
                vector.len()
            )))
        }
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
