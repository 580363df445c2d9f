use strata_rbf::generate_random_points;
use strata_rbf::{
    RBFInterpolator, RBFTestFunctions, create_evaluation_grid, write_values_csv,
    interpolant_config::{RBFConfig, RBFKernelType},
    progress::closure_sink,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Scatter 300 borehole picks over a 100 x 100 area, all at z = 0
    let num_points = 300usize;
    let unit = generate_random_points(num_points, 2, Some(42));
    let points = faer::Mat::from_fn(num_points, 3, |i, j| match j {
        2 => 0.0,
        _ => 100.0 * unit[(i, j)],
    });

    // Elevation of the layer at each pick
    let point_values = RBFTestFunctions::layer_elevation(&points);

    // Print solver progress as it arrives
    let (sink, handle) = closure_sink(256, |msg| println!("{:?}", msg));

    // A gaussian kernel scaled to a 5 unit mesh
    let mut config = RBFConfig::builder(RBFKernelType::Gaussian)
        .shape(2.0)
        .build();
    config.mesh_compatibility.target_mesh_size = 5.0;

    let rbfi = RBFInterpolator::builder(config)
        .progress_callback(sink)
        .build()?;

    // Evaluate on a 60 x 60 grid covering the picks. With 300 points the
    // system is solved with Conjugate Gradient.
    let n = 60;
    let target_points = create_evaluation_grid(&[(0.0, 100.0), (0.0, 100.0), (0.0, 0.0)], &[n, n, 1]);
    let result = rbfi.interpolate(&points, &point_values, &target_points)?;

    println!(
        "solver: {:?} after {} iterations, residual {:e}, quality {:.3}, mesh ready: {}",
        result.solver.method,
        result.solver.iterations,
        result.residual,
        result.quality_metrics.quality_score,
        result.quality_metrics.mesh_readiness,
    );

    let out_dir = std::env::temp_dir();
    result.save_json(out_dir.join("layer_surface.json"))?;

    let values = faer::Mat::from_fn(result.values.len(), 1, |i, _| result.values[i]);
    write_values_csv(&target_points, &values, out_dir.join("layer_surface.csv"))?;

    drop(rbfi);
    let _ = handle.join();

    Ok(())
}
