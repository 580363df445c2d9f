use strata_rbf::{
    RBFInterpolator, RBFTestFunctions, generate_random_points,
    interpolant_config::{RBFConfig, RBFKernelType},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Franke's function sampled on 80 points, stretched to a 10 unit cube
    let num_points = 80usize;
    let unit = generate_random_points(num_points, 3, Some(7));
    let point_values = RBFTestFunctions::franke_3d(&unit);
    let points = faer::Mat::from_fn(num_points, 3, |i, j| 10.0 * unit[(i, j)]);

    let rbfi = RBFInterpolator::new(RBFConfig::builder(RBFKernelType::Multiquadric).build())?;

    // Try the default log-spaced shape candidates with 5 fold cross-validation
    let search = rbfi.optimize_shape(&points, &point_values, &[], 5)?;
    for (shape, r2) in search.candidates.iter().zip(&search.scores) {
        println!("shape {:>10.4e}  R² {:>8.4}", shape, r2);
    }
    println!("best shape: {}", search.best_shape);

    // Report the cross-validation errors for the chosen shape
    let tuned = RBFInterpolator::new(
        RBFConfig::builder(RBFKernelType::Multiquadric)
            .shape(search.best_shape)
            .build(),
    )?;
    let report = tuned.cross_validate(&points, &point_values, 5)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
