//! Integration tests for the sampling/KDE kernel filter

use scalar_bayes_filters_rs::common::metrics::kl_divergence;
use scalar_bayes_filters_rs::models::{RandomWalk, SaturatedRandomWalk};
use scalar_bayes_filters_rs::simulate::simulate;
use scalar_bayes_filters_rs::{Grid, KernelFilter, KernelFilterConfig, PointMassFilter, SimpleRng};

fn kernel_config(num_samples: usize) -> KernelFilterConfig {
    KernelFilterConfig {
        num_samples,
        kernel_variance: 0.15,
        gate_factor: 3.0,
    }
}

#[test]
fn approximation_improves_with_more_samples() {
    // KL divergence from the exact point-mass posterior must shrink as
    // the particle count grows, on every seed and on average
    let grid = Grid::linspace(-12.0, 12.0, 241).unwrap();
    let model = RandomWalk::new(1.0, 1.0, 0.0, 1.0).unwrap();
    let max_iter = 8;

    let mut coarse_total = 0.0;
    let mut fine_total = 0.0;
    for seed in [12u64, 20, 21] {
        let mut sim_rng = SimpleRng::new(seed);
        let sim = simulate(&mut sim_rng, &model, max_iter);

        let exact = PointMassFilter::new(&grid, &model)
            .run(&sim.observations)
            .unwrap();

        let mut mean_kl = |num_samples: usize| -> f64 {
            let engine = KernelFilter::new(&grid, &model, kernel_config(num_samples)).unwrap();
            let mut rng = SimpleRng::new(seed + 1000);
            let output = engine.run(&mut rng, &sim.observations).unwrap();
            let mut total = 0.0;
            for k in 1..=max_iter {
                total += kl_divergence(
                    exact.filtered_at(k).unwrap(),
                    output.filtered_at(k).unwrap(),
                    &grid,
                )
                .unwrap();
            }
            total / max_iter as f64
        };

        let coarse = mean_kl(1_000);
        let fine = mean_kl(10_000);
        assert!(
            fine < coarse,
            "seed {}: KL did not shrink ({} vs {})",
            seed,
            fine,
            coarse
        );
        assert!(coarse < 0.1, "seed {}: coarse KL too large: {}", seed, coarse);
        coarse_total += coarse;
        fine_total += fine;
    }
    assert!(fine_total < coarse_total);
}

#[test]
fn tracks_through_saturated_measurements() {
    // Hard clipping leaves no usable likelihood for the exact engine;
    // the sampling engine pushes simulated measurements through the
    // same saturation and gates on them instead
    let grid = Grid::linspace(-6.0, 6.0, 500).unwrap();
    let model = SaturatedRandomWalk::new();
    let mut sim_rng = SimpleRng::new(42);
    let sim = simulate(&mut sim_rng, &model, 24);

    let engine = KernelFilter::new(&grid, &model, kernel_config(2_000)).unwrap();
    let mut rng = SimpleRng::new(7);
    let output = engine.run(&mut rng, &sim.observations).unwrap();

    assert_eq!(output.num_timesteps(), 25);
    assert!(output.smoothed().is_none());

    let mut total_error = 0.0;
    for k in 1..=24 {
        let filtered = output.filtered_at(k).unwrap();
        assert!(
            (filtered.integral(&grid) - 1.0).abs() < 1e-6,
            "filtering density at {} not normalized",
            k
        );
        let mean = filtered.mean(&grid);
        assert!(mean.is_finite());
        assert!(mean.abs() <= 6.0);
        total_error += (mean - sim.states[k]).abs();
    }
    // Process noise is unit variance, so a healthy tracker stays well
    // under one noise standard deviation on average
    let mean_error = total_error / 24.0;
    assert!(mean_error < 1.0, "mean tracking error too large: {}", mean_error);
}

#[test]
fn initial_observation_sentinel_is_never_read() {
    let grid = Grid::linspace(-6.0, 6.0, 400).unwrap();
    let model = SaturatedRandomWalk::new();
    let mut sim_rng = SimpleRng::new(42);
    let sim = simulate(&mut sim_rng, &model, 8);
    let engine = KernelFilter::new(&grid, &model, kernel_config(500)).unwrap();

    let mut rng = SimpleRng::new(3);
    let reference = engine.run(&mut rng, &sim.observations).unwrap();

    let mut observations = sim.observations.clone();
    observations[0] = -4.0e9;
    let mut rng = SimpleRng::new(3);
    let output = engine.run(&mut rng, &observations).unwrap();

    for k in 0..=8 {
        assert_eq!(
            reference.filtered_at(k).unwrap().values(),
            output.filtered_at(k).unwrap().values()
        );
    }
}

#[test]
fn identical_seeds_reproduce_identical_outputs() {
    let grid = Grid::linspace(-6.0, 6.0, 400).unwrap();
    let model = SaturatedRandomWalk::new();
    let mut sim_rng = SimpleRng::new(11);
    let sim = simulate(&mut sim_rng, &model, 6);
    let engine = KernelFilter::new(&grid, &model, kernel_config(500)).unwrap();

    let mut rng_a = SimpleRng::new(99);
    let run_a = engine.run(&mut rng_a, &sim.observations).unwrap();
    let mut rng_b = SimpleRng::new(99);
    let run_b = engine.run(&mut rng_b, &sim.observations).unwrap();

    for k in 0..=6 {
        assert_eq!(
            run_a.filtered_at(k).unwrap().values(),
            run_b.filtered_at(k).unwrap().values()
        );
        if k >= 1 {
            assert_eq!(
                run_a.predicted_at(k).unwrap().values(),
                run_b.predicted_at(k).unwrap().values()
            );
        }
    }
}
