use gridrelax::config::RelaxConfig;
use gridrelax::grid::Grid;
use gridrelax::init;
use gridrelax::partition::*;
use gridrelax::solver::*;
use gridrelax::worker::relax_chunk;

use float_cmp::assert_approx_eq;

const DRIVERS: [Driver; 5] = [
    Driver::ForkJoin,
    Driver::Persistent,
    Driver::PersistentCopyBack,
    Driver::Rayon,
    Driver::Sequential,
];

#[derive(Default)]
struct Recorder {
    iterations: Vec<usize>,
    within_precision: Vec<bool>,
    last: Vec<f64>,
}

impl IterationObserver for Recorder {
    fn on_pass(&mut self, report: &PassReport<'_>) {
        self.iterations.push(report.iteration);
        self.within_precision.push(report.within_precision);
        self.last = report.values.to_vec();
    }
}

#[test]
fn drivers_agree() {
    let input = init::random_seeded(14, 7);
    let base = RelaxConfig::new(4, 1e-6);
    let reference = relax(input.clone(), &base.with_driver(Driver::Sequential)).unwrap();
    assert!(reference.converged);
    assert!(reference.iterations > 1);

    for driver in DRIVERS {
        for cores in [1, 2, 3, 4, 7] {
            let config = RelaxConfig::new(cores, 1e-6).with_driver(driver);
            let outcome = relax(input.clone(), &config).unwrap();
            assert!(outcome.converged, "{driver:?} with {cores} cores");
            assert_eq!(
                outcome.iterations, reference.iterations,
                "{driver:?} with {cores} cores"
            );
            assert!(
                outcome.grid.approx_eq(&reference.grid, 1e-6),
                "{driver:?} with {cores} cores"
            );
        }
    }
}

#[test]
fn one_and_four_cores_fixed_point() {
    let input = init::random_seeded(20, 11);
    for driver in [Driver::ForkJoin, Driver::Persistent] {
        let one = relax(input.clone(), &RelaxConfig::new(1, 1e-8).with_driver(driver)).unwrap();
        let four = relax(input.clone(), &RelaxConfig::new(4, 1e-8).with_driver(driver)).unwrap();
        assert_eq!(one.iterations, four.iterations);
        assert!(one.grid.approx_eq(&four.grid, 1e-8));
    }
}

#[test]
fn boundary_unchanged() {
    let input = init::random_seeded(11, 3);
    for driver in DRIVERS {
        let config = RelaxConfig::new(3, 1e-5).with_driver(driver);
        let outcome = relax(input.clone(), &config).unwrap();
        assert_eq!(outcome.grid.boundary_values(), input.boundary_values());
    }
    let outcome = gauss_seidel::relax(input.clone(), &RelaxConfig::new(1, 1e-5)).unwrap();
    assert_eq!(outcome.grid.boundary_values(), input.boundary_values());
}

#[test]
fn zero_boundary_decays() {
    // Every interior cell halves each pass: 10 / 2^n
    let input = Grid::with_boundary(4, 0.0, 10.0);
    for driver in DRIVERS {
        let config = RelaxConfig::new(4, 1e-10).with_driver(driver);
        let outcome = relax(input.clone(), &config).unwrap();
        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 37);
        for v in outcome.grid.buffer() {
            assert_approx_eq!(f64, *v, 0.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn converged_grid_is_fixed_point() {
    let input = init::random_seeded(16, 21);
    let outcome = relax(input, &RelaxConfig::new(4, 1e-6)).unwrap();
    let grid = outcome.grid;

    let dimension = grid.dimension();
    let chunk = partition(dimension, 1, PartitionStrategy::Balanced).unwrap()[0];
    let mut next = grid.clone();
    let within = relax_chunk(
        grid.buffer(),
        &mut next.buffer_mut()[chunk.linear_range()],
        &chunk,
        dimension,
        1e-6,
    );
    assert!(within);
    assert!(next.approx_eq(&grid, 1e-6));
}

#[test]
fn iteration_cap() {
    let input = init::random_seeded(16, 5);
    let mut capped = Vec::new();
    for driver in DRIVERS {
        let config = RelaxConfig::new(4, 1e-10)
            .with_driver(driver)
            .with_max_iterations(5);
        let outcome = relax(input.clone(), &config).unwrap();
        assert_eq!(outcome.iterations, 5, "{driver:?}");
        assert!(!outcome.converged, "{driver:?}");
        capped.push(outcome.grid);
    }
    for grid in &capped[1..] {
        assert_eq!(grid, &capped[0]);
    }
}

#[test]
fn gauss_seidel_needs_fewer_passes() {
    let input = init::random_seeded(12, 9);
    let config = RelaxConfig::new(1, 1e-8);
    let jacobi = relax(input.clone(), &config).unwrap();
    let in_place = gauss_seidel::relax(input, &config).unwrap();
    assert!(in_place.converged);
    assert!(in_place.iterations <= jacobi.iterations);
    assert!(in_place.grid.approx_eq(&jacobi.grid, 1e-5));
}

#[test]
fn row_aligned_matches_balanced() {
    let input = init::random_seeded(13, 1);
    for driver in DRIVERS {
        let config = RelaxConfig::new(3, 1e-6).with_driver(driver);
        let balanced = relax(input.clone(), &config).unwrap();
        let rows = relax(
            input.clone(),
            &config.with_partition(PartitionStrategy::RowAligned),
        )
        .unwrap();
        assert_eq!(balanced.iterations, rows.iterations);
        assert_eq!(balanced.grid, rows.grid);
    }
}

#[test]
fn observer_sees_every_pass() {
    let input = init::random_seeded(10, 2);
    for driver in DRIVERS {
        let config = RelaxConfig::new(3, 1e-6).with_driver(driver);
        let mut recorder = Recorder::default();
        let outcome = relax_observed(input.clone(), &config, &mut recorder).unwrap();

        let expected: Vec<usize> = (1..=outcome.iterations).collect();
        assert_eq!(recorder.iterations, expected, "{driver:?}");
        let (last, earlier) = recorder.within_precision.split_last().unwrap();
        assert!(*last);
        assert!(earlier.iter().all(|w| !w));
        assert_eq!(recorder.last, outcome.grid.buffer());
    }
}

#[test]
fn minimal_grid() {
    // Single interior cell, more workers than cells
    let input = Grid::from_vec(3, vec![1.0, 2.0, 3.0, 4.0, 9.0, 6.0, 7.0, 8.0, 9.0]).unwrap();
    for driver in DRIVERS {
        let outcome = relax(input.clone(), &RelaxConfig::new(8, 1e-10).with_driver(driver)).unwrap();
        assert_eq!(outcome.iterations, 2);
        assert_approx_eq!(f64, outcome.grid.buffer()[4], 5.0, ulps = 2);
    }
}
