//! Synthetic CPU workloads
//!
//! Each workload builds its own data, runs a fixed computation and times the
//! whole thing (setup included) with a wall clock. The pure kernels are
//! exposed separately so they can be checked without timing noise.

use std::hint::black_box;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::WorkloadSizes;
use crate::models::{BenchmarkResult, PrimaryOutput};
use crate::util::units::{format_compact_count, format_number};
use crate::{CpurbError, Result};

/// Exclusive upper bound of the values generated for the sort workload
pub const SORT_VALUE_RANGE: u32 = 1_000_000;

/// Count primes in `[2, limit]` by trial division up to the square root
pub fn count_primes(limit: u64) -> u64 {
    let mut count = 0;
    for i in 2..=limit {
        let mut is_prime = true;
        let mut j = 2;
        while j * j <= i {
            if i % j == 0 {
                is_prime = false;
                break;
            }
            j += 1;
        }
        if is_prime {
            count += 1;
        }
    }
    count
}

/// Naive exponential Fibonacci
pub fn fibonacci(n: u32) -> u64 {
    if n <= 1 {
        return n as u64;
    }
    fibonacci(n - 1) + fibonacci(n - 2)
}

/// Sum of `sin(i)*cos(i) + sqrt(i) + (i mod 100)^2` over `i in 0..iterations`
pub fn math_accumulate(iterations: u64) -> f64 {
    let mut sum = 0.0;
    for i in 0..iterations {
        let x = i as f64;
        sum += x.sin() * x.cos() + x.sqrt() + ((i % 100) as f64).powi(2);
    }
    sum
}

/// `size` uniform integers in `[0, SORT_VALUE_RANGE)`
pub fn random_values<R: Rng>(rng: &mut R, size: usize) -> Vec<u32> {
    (0..size).map(|_| rng.gen_range(0..SORT_VALUE_RANGE)).collect()
}

/// Sort ascending in place and hand the vector back
pub fn sort_values(mut values: Vec<u32>) -> Vec<u32> {
    values.sort_unstable();
    values
}

/// Row-major `dimension x dimension` matrix with entries in `[0, 1)`
pub fn random_matrix<R: Rng>(rng: &mut R, dimension: usize) -> Vec<f64> {
    (0..dimension * dimension).map(|_| rng.gen::<f64>()).collect()
}

/// Triple-loop product of two row-major square matrices
pub fn multiply_matrices(a: &[f64], b: &[f64], dimension: usize) -> Result<Vec<f64>> {
    let cells = dimension.checked_mul(dimension).ok_or_else(|| {
        CpurbError::WorkloadFailed(format!("Matrix dimension {} overflows", dimension))
    })?;
    if a.len() != cells || b.len() != cells {
        return Err(CpurbError::WorkloadFailed(format!(
            "Matrix operands must have {} entries, got {} and {}",
            cells,
            a.len(),
            b.len()
        )));
    }

    let mut c = vec![0.0; cells];
    for i in 0..dimension {
        for j in 0..dimension {
            let mut acc = 0.0;
            for k in 0..dimension {
                acc += a[i * dimension + k] * b[k * dimension + j];
            }
            c[i * dimension + j] = acc;
        }
    }
    Ok(c)
}

pub fn prime_count(sizes: &WorkloadSizes) -> Result<BenchmarkResult> {
    let limit = sizes.prime_limit;
    let start = Instant::now();
    let count = black_box(count_primes(black_box(limit)));
    let elapsed = start.elapsed();

    Ok(BenchmarkResult::new(
        format!("Finding primes up to {}", format_number(limit as f64)),
        elapsed,
        PrimaryOutput::Count(count),
        limit as f64,
    ))
}

/// The whole recursion counts as one operation, so the rate is `1 / seconds`.
pub fn recursive_fibonacci(sizes: &WorkloadSizes) -> Result<BenchmarkResult> {
    let n = sizes.fibonacci_n;
    let start = Instant::now();
    let value = black_box(fibonacci(black_box(n)));
    let elapsed = start.elapsed();

    Ok(BenchmarkResult::new(
        format!("Recursive Fibonacci({})", n),
        elapsed,
        PrimaryOutput::Count(value),
        1.0,
    ))
}

pub fn math_loop(sizes: &WorkloadSizes) -> Result<BenchmarkResult> {
    let iterations = sizes.math_iterations;
    let start = Instant::now();
    let sum = black_box(math_accumulate(black_box(iterations)));
    let elapsed = start.elapsed();

    Ok(BenchmarkResult::new(
        format!("{} math operations", format_compact_count(iterations)),
        elapsed,
        // every term after i = 0 is positive
        PrimaryOutput::Count(sum.round() as u64),
        iterations as f64,
    ))
}

pub fn array_sort(sizes: &WorkloadSizes) -> Result<BenchmarkResult> {
    let size = sizes.sort_size;
    let start = Instant::now();
    let mut rng = SmallRng::from_entropy();
    let values = black_box(sort_values(random_values(&mut rng, size)));
    let elapsed = start.elapsed();

    Ok(BenchmarkResult::new(
        format!("Sorting {} numbers", format_compact_count(size as u64)),
        elapsed,
        PrimaryOutput::Count(values.len() as u64),
        size as f64,
    ))
}

/// Rate is `D^3 / seconds`, the number of scalar multiply-adds.
pub fn matrix_multiply(sizes: &WorkloadSizes) -> Result<BenchmarkResult> {
    let dimension = sizes.matrix_dimension;
    let start = Instant::now();
    let mut rng = SmallRng::from_entropy();
    let a = random_matrix(&mut rng, dimension);
    let b = random_matrix(&mut rng, dimension);
    let product = black_box(multiply_matrices(&a, &b, dimension)?);
    let elapsed = start.elapsed();
    drop(product);

    let d = dimension as f64;
    Ok(BenchmarkResult::new(
        format!("{}x{} matrix multiplication", dimension, dimension),
        elapsed,
        PrimaryOutput::Text(format!("{}x{}", dimension, dimension)),
        d * d * d,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionMode;

    fn tiny_sizes() -> WorkloadSizes {
        WorkloadSizes {
            prime_limit: 100,
            fibonacci_n: 10,
            math_iterations: 0,
            sort_size: 50,
            matrix_dimension: 3,
        }
    }

    #[test]
    fn test_count_primes() {
        assert_eq!(count_primes(0), 0);
        assert_eq!(count_primes(1), 0);
        assert_eq!(count_primes(2), 1);
        assert_eq!(count_primes(10), 4);
        assert_eq!(count_primes(100), 25);
        assert_eq!(count_primes(10_000), 1229);
    }

    #[test]
    fn test_fibonacci() {
        assert_eq!(fibonacci(0), 0);
        assert_eq!(fibonacci(1), 1);
        assert_eq!(fibonacci(2), 1);
        assert_eq!(fibonacci(10), 55);
        assert_eq!(fibonacci(20), 6765);
    }

    #[test]
    fn test_math_accumulate_empty_loop() {
        assert_eq!(math_accumulate(0), 0.0);
    }

    #[test]
    fn test_math_accumulate_small() {
        // i = 0 contributes 0; i = 1 contributes sin(1)cos(1) + 1 + 1
        let expected = 1f64.sin() * 1f64.cos() + 2.0;
        assert!((math_accumulate(2) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_sorted_values_are_ordered_and_complete() {
        let mut rng = SmallRng::seed_from_u64(7);
        for size in [0usize, 1, 2, 17, 1000, 25_000] {
            let input = random_values(&mut rng, size);
            let input_sum: u64 = input.iter().map(|&v| v as u64).sum();

            let sorted = sort_values(input);
            assert_eq!(sorted.len(), size);
            assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
            assert!(sorted.iter().all(|&v| v < SORT_VALUE_RANGE));
            assert_eq!(sorted.iter().map(|&v| v as u64).sum::<u64>(), input_sum);
        }
    }

    #[test]
    fn test_sort_values_keeps_duplicates() {
        assert_eq!(sort_values(vec![3, 1, 3, 0, 1]), vec![0, 1, 1, 3, 3]);
        assert!(sort_values(Vec::new()).is_empty());
    }

    #[test]
    fn test_multiply_known_matrices() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];
        let c = multiply_matrices(&a, &b, 2).unwrap();
        assert_eq!(c, vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_multiply_random_matrices_shape() {
        let mut rng = SmallRng::seed_from_u64(42);
        let d = 12;
        let a = random_matrix(&mut rng, d);
        let b = random_matrix(&mut rng, d);
        assert!(a.iter().all(|&x| (0.0..1.0).contains(&x)));

        let c = multiply_matrices(&a, &b, d).unwrap();
        assert_eq!(c.len(), d * d);
        assert!(c.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_multiply_rejects_mismatched_operands() {
        let err = multiply_matrices(&[1.0; 4], &[1.0; 3], 2);
        assert!(matches!(err, Err(CpurbError::WorkloadFailed(_))));
    }

    #[test]
    fn test_workload_results() {
        let sizes = tiny_sizes();

        let primes = prime_count(&sizes).unwrap();
        assert_eq!(primes.primary_output, PrimaryOutput::Count(25));
        assert_eq!(primes.description, "Finding primes up to 100");

        let fib = recursive_fibonacci(&sizes).unwrap();
        assert_eq!(fib.primary_output, PrimaryOutput::Count(55));
        assert_eq!(fib.description, "Recursive Fibonacci(10)");

        let math = math_loop(&sizes).unwrap();
        assert_eq!(math.primary_output, PrimaryOutput::Count(0));
        assert_eq!(math.ops_per_second, 0.0);

        let sort = array_sort(&sizes).unwrap();
        assert_eq!(sort.primary_output, PrimaryOutput::Count(50));
        assert_eq!(sort.description, "Sorting 50 numbers");

        let matrix = matrix_multiply(&sizes).unwrap();
        assert_eq!(matrix.primary_output, PrimaryOutput::Text("3x3".to_string()));
        assert_eq!(matrix.description, "3x3 matrix multiplication");

        for result in [&primes, &fib, &math, &sort, &matrix] {
            assert!(result.duration_ms >= 0.0);
            assert!(result.ops_per_second >= 0.0);
            assert!(result.error.is_none());
        }
    }

    #[test]
    fn test_lite_descriptions() {
        let sizes = ExecutionMode::Lite.sizes();
        let primes = prime_count(&sizes).unwrap();
        assert_eq!(primes.description, "Finding primes up to 10,000");
        assert_eq!(primes.primary_output, PrimaryOutput::Count(1229));

        let math = math_loop(&sizes).unwrap();
        assert_eq!(math.description, "200K math operations");
        let json = serde_json::to_value(&math.primary_output).unwrap();
        assert!(json.is_u64(), "math sum serialized as {}", json);

        let sort = array_sort(&sizes).unwrap();
        assert_eq!(sort.description, "Sorting 25K numbers");
    }
}
