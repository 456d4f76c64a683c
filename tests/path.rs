use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use song_reconstructor_core::core::path::{path_cost, random_path, solve_path};
use song_reconstructor_core::ReconstructError;

fn random_symmetric(n: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut m = Array2::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n {
            let d = rng.gen_range(0.0..100.0);
            m[(i, j)] = d;
            m[(j, i)] = d;
        }
    }
    m
}

fn assert_permutation(path: &[usize], n: usize) {
    let mut seen = vec![false; n];
    assert_eq!(path.len(), n);
    for &p in path {
        assert!(p < n, "index {p} out of range");
        assert!(!seen[p], "index {p} visited twice");
        seen[p] = true;
    }
}

#[test]
fn all_ties_keep_original_order() {
    let m = Array2::<f64>::zeros((10, 10));
    assert_eq!(solve_path(&m).unwrap(), (0..10).collect::<Vec<_>>());
}

#[test]
fn trivial_sizes() {
    assert_eq!(solve_path(&Array2::zeros((0, 0))).unwrap(), Vec::<usize>::new());
    assert_eq!(solve_path(&Array2::zeros((1, 1))).unwrap(), vec![0]);
    assert_eq!(solve_path(&Array2::zeros((2, 2))).unwrap(), vec![0, 1]);
}

#[test]
fn output_is_a_permutation_for_many_sizes() {
    for n in 1..=25 {
        let m = random_symmetric(n, n as u64);
        assert_permutation(&solve_path(&m).unwrap(), n);
    }
}

#[test]
fn solver_is_deterministic() {
    let m = random_symmetric(40, 99);
    assert_eq!(solve_path(&m).unwrap(), solve_path(&m).unwrap());
}

#[test]
fn points_on_a_line_are_visited_in_position_order() {
    let xs = [3.0, 0.0, 4.0, 1.0, 2.0];
    let m = Array2::from_shape_fn((5, 5), |(i, j)| f64::abs(xs[i] - xs[j]));

    let path = solve_path(&m).unwrap();
    assert_eq!(path, vec![1, 3, 4, 0, 2]);
    assert_eq!(path_cost(&m, &path), 4.0);
}

#[test]
fn greedy_beats_identity_on_shuffled_line() {
    let mut rng = StdRng::seed_from_u64(5);
    let xs: Vec<f64> = (0..30).map(|_| rng.gen_range(0.0..1000.0)).collect();
    let m = Array2::from_shape_fn((30, 30), |(i, j)| f64::abs(xs[i] - xs[j]));

    let identity: Vec<usize> = (0..30).collect();
    let path = solve_path(&m).unwrap();
    assert!(path_cost(&m, &path) <= path_cost(&m, &identity));
}

#[test]
fn non_square_matrix_is_rejected() {
    let err = solve_path(&Array2::zeros((2, 3))).unwrap_err();
    assert!(matches!(err, ReconstructError::InvariantViolation(_)));
}

#[test]
fn random_path_is_a_seeded_permutation() {
    let a = random_path(50, &mut StdRng::seed_from_u64(3));
    let b = random_path(50, &mut StdRng::seed_from_u64(3));
    assert_permutation(&a, 50);
    assert_eq!(a, b);
}
