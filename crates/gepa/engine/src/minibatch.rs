use crate::error::EngineError;
use rand::Rng;

/// A uniform sample of the training pool, drawn without replacement.
#[derive(Clone, Debug, PartialEq)]
pub struct Minibatch<I> {
    /// Positions of the sampled instances in the training pool.
    pub indices: Vec<usize>,
    pub instances: Vec<I>,
}

impl<I> Minibatch<I> {
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.instances.len()
    }
}

/// Draw `size` instances from `pool` without replacement.
///
/// A pool no larger than `size` is used whole, in pool order.
pub fn sample_minibatch<I: Clone, R: Rng + ?Sized>(
    pool: &[I],
    size: usize,
    rng: &mut R,
) -> Result<Minibatch<I>, EngineError> {
    if pool.is_empty() {
        return Err(EngineError::EmptyTrainingPool);
    }

    let indices = if pool.len() <= size {
        (0..pool.len()).collect::<Vec<_>>()
    } else {
        rand::seq::index::sample(rng, pool.len(), size).into_vec()
    };
    let instances = indices.iter().map(|&i| pool[i].clone()).collect();

    Ok(Minibatch { indices, instances })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn pool(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("sentence {}", i)).collect()
    }

    #[test]
    fn sample_has_requested_size_without_repeats() {
        let mut rng = StdRng::seed_from_u64(1);
        let batch = sample_minibatch(&pool(50), 5, &mut rng).unwrap();
        assert_eq!(batch.len(), 5);
        let unique: HashSet<_> = batch.indices.iter().collect();
        assert_eq!(unique.len(), 5);
        for (index, instance) in batch.indices.iter().zip(&batch.instances) {
            assert_eq!(instance, &format!("sentence {}", index));
        }
    }

    #[test]
    fn small_pool_used_whole() {
        let mut rng = StdRng::seed_from_u64(1);
        let batch = sample_minibatch(&pool(3), 5, &mut rng).unwrap();
        assert_eq!(batch.indices, vec![0, 1, 2]);
    }

    #[test]
    fn empty_pool_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = sample_minibatch::<String, _>(&[], 5, &mut rng);
        assert!(matches!(result, Err(EngineError::EmptyTrainingPool)));
    }

    #[test]
    fn same_seed_same_sample() {
        let data = pool(100);
        let a = sample_minibatch(&data, 7, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = sample_minibatch(&data, 7, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }
}
