use burn::data::dataset::Dataset;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::marker::PhantomData;

/// A random, order-preserving subset of another dataset.
pub struct SubDataset<D, I> {
    dataset: D,
    limit: usize,
    indices: Vec<usize>,
    item: PhantomData<fn() -> I>,
}

impl<D, I> SubDataset<D, I>
where
    D: Dataset<I>,
{
    pub fn new_with_seed(dataset: D, limit: usize, seed: Option<u64>) -> Self {
        let limit = std::cmp::min(limit, dataset.len());
        let indices = sample_indices(dataset.len(), limit, seed);

        Self {
            dataset,
            limit,
            indices,
            item: PhantomData,
        }
    }

    pub fn resample(&mut self, seed: Option<u64>) {
        self.indices = sample_indices(self.dataset.len(), self.limit, seed);
    }
}

fn sample_indices(len: usize, limit: usize, seed: Option<u64>) -> Vec<usize> {
    let mut rng = match seed {
        Some(s) => rand::rngs::StdRng::seed_from_u64(s),
        None => rand::rngs::StdRng::from_entropy(),
    };

    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(&mut rng);
    indices.truncate(limit);
    indices.sort_unstable();
    indices
}

impl<D, I> Dataset<I> for SubDataset<D, I>
where
    D: Dataset<I>,
{
    fn get(&self, index: usize) -> Option<I> {
        self.indices.get(index).and_then(|&i| self.dataset.get(i))
    }

    fn len(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::data::dataset::InMemDataset;

    fn numbers() -> InMemDataset<usize> {
        InMemDataset::new((0..20).collect())
    }

    #[test]
    fn test_subset_is_sorted_and_bounded() {
        let subset = SubDataset::new_with_seed(numbers(), 5, Some(42));
        assert_eq!(subset.len(), 5);

        let items: Vec<usize> = (0..subset.len()).filter_map(|i| subset.get(i)).collect();
        assert_eq!(items.len(), 5);
        assert!(items.windows(2).all(|w| w[0] < w[1]));
        assert!(subset.get(5).is_none());
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = SubDataset::new_with_seed(numbers(), 8, Some(7));
        let mut b = SubDataset::new_with_seed(numbers(), 8, Some(1));
        b.resample(Some(7));

        for i in 0..8 {
            assert_eq!(a.get(i), b.get(i));
        }
    }

    #[test]
    fn test_limit_clamped_to_dataset() {
        let subset = SubDataset::new_with_seed(numbers(), 100, None);
        assert_eq!(subset.len(), 20);
    }
}
