//! Batch address construction
//!
//! Building the addresses of a large tensor is dominated by label interning.
//! With the `parallel` feature these helpers spread the work over the rayon
//! thread pool, all threads sharing one [`LabelCache`]; without it they run
//! sequentially with the same results.
//!
//! # Examples
//!
//! ```
//! use tenaddr_core::parallel::par_of_strings;
//! use tenaddr_label::LabelCache;
//!
//! let cache = LabelCache::new(64, 1 << 20);
//! let rows: Vec<Vec<String>> = (0..100)
//!     .map(|i| vec![format!("user{}", i % 5), "score".to_string()])
//!     .collect();
//!
//! let addresses = par_of_strings(&cache, &rows).unwrap();
//! assert_eq!(addresses.len(), 100);
//! assert_eq!(addresses[0], addresses[5]);
//! assert_eq!(cache.size(), 6);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tenaddr_label::LabelCache;

use crate::address::TensorAddress;
use crate::error::AddressResult;

/// Build one address per row of string coordinates, interning in `cache`
///
/// Output order matches `rows`. Fails with the first error encountered.
#[cfg(feature = "parallel")]
pub fn par_of_strings<S>(cache: &LabelCache, rows: &[Vec<S>]) -> AddressResult<Vec<TensorAddress>>
where
    S: AsRef<str> + Sync,
{
    let addresses = rows
        .par_iter()
        .map(|row| TensorAddress::of_strings_in(cache, row))
        .collect::<AddressResult<Vec<_>>>()?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        rows = rows.len(),
        live_labels = cache.size(),
        "parallel_address_batch"
    );

    Ok(addresses)
}

/// Sequential fallback when the `parallel` feature is disabled
#[cfg(not(feature = "parallel"))]
pub fn par_of_strings<S>(cache: &LabelCache, rows: &[Vec<S>]) -> AddressResult<Vec<TensorAddress>>
where
    S: AsRef<str> + Sync,
{
    rows.iter()
        .map(|row| TensorAddress::of_strings_in(cache, row))
        .collect()
}

/// Build one address per row of numeric coordinates
#[cfg(feature = "parallel")]
pub fn par_of_indices(rows: &[Vec<u64>]) -> Vec<TensorAddress> {
    rows.par_iter()
        .map(|row| TensorAddress::of_indices(row))
        .collect()
}

/// Sequential fallback when the `parallel` feature is disabled
#[cfg(not(feature = "parallel"))]
pub fn par_of_indices(rows: &[Vec<u64>]) -> Vec<TensorAddress> {
    rows.iter().map(|row| TensorAddress::of_indices(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_matches_sequential() {
        let cache = LabelCache::new(16, 1 << 20);
        let rows: Vec<Vec<&str>> = (0..50)
            .map(|i| vec![["a", "b", "c"][i % 3], "x"])
            .collect();

        let batch = par_of_strings(&cache, &rows).unwrap();
        for (row, address) in rows.iter().zip(&batch) {
            assert_eq!(address, &TensorAddress::of_strings_in(&cache, row).unwrap());
        }
        assert_eq!(cache.size(), 4);
    }

    #[test]
    fn test_index_batch() {
        let rows = vec![vec![0, 1], vec![2, 3]];
        let batch = par_of_indices(&rows);
        assert_eq!(batch[1], TensorAddress::of_indices(&[2, 3]));
    }

    #[test]
    fn test_batch_error_propagates() {
        let cache = LabelCache::new(4, 2);
        let rows = vec![vec!["a"], vec!["b"], vec!["c"]];
        // Only two ordinals: three distinct live strings cannot all be interned.
        assert!(par_of_strings(&cache, &rows).is_err());
    }
}
