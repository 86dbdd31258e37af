use std::env;
use std::error::Error;
use std::io::BufRead;
use std::path::PathBuf;
use std::thread;

use log::{info, LevelFilter};

use optirotor::algorithms::{
    Algorithm, ArtifactExport, MaxGenerationValue, NSGA3Arg, StoppingConditionType, NSGA3,
};
use optirotor::core::GeneSpace;
use optirotor::evaluation::{
    ObjectiveDirection, OperatingPoint, ResultMetric, ResultObjective, RotorEvaluator,
    RotorEvaluatorArgs,
};
use optirotor::operators::{PolynomialMutationArgs, SimulatedBinaryCrossoverArgs};
use optirotor::utils::NumberOfPartitions;

/// Design a two-blade rotor with 6 sections that maximises the efficiency at 6500 rpm, while
/// producing at least 1 N of thrust at 6500 rpm and 3 N at 9500 rpm. The genes are the chords
/// (between 5 and 40 mm) followed by the twist angles (between 0 and 22 degrees) of each section.
///
/// The solver executable and the working directory (where the `AG14_Re50000.txt` polar file must
/// be) can be set with the first two command line arguments. They default to `xrotor` and the
/// current directory. The designs of each generation and the statistics are saved to the working
/// directory. Press Ctrl-C (or type `q` and press enter) to stop the optimisation after the
/// current generation; the population and statistics evolved so far are kept.
///
/// Make sure to compile this in release mode:
///
/// `cargo run --example rotor_design --release -- /path/to/xrotor /path/to/work_dir`
fn main() -> Result<(), Box<dyn Error>> {
    // Add log
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let mut cli_args = env::args().skip(1);
    let solver = cli_args.next().unwrap_or_else(|| "xrotor".to_string());
    let work_dir = match cli_args.next() {
        Some(d) => PathBuf::from(d),
        None => env::current_dir()?,
    };

    let radius_ratios = vec![0.1, 0.3, 0.5, 0.7, 0.9, 1.0];
    let sections = radius_ratios.len();
    let evaluator = RotorEvaluator::new(RotorEvaluatorArgs {
        solver: PathBuf::from(solver),
        work_dir: work_dir.clone(),
        polar_file: Some(PathBuf::from("AG14_Re50000.txt")),
        tip_radius: 0.07,
        hub_radius: 0.005,
        radius_ratios,
        blade_count: 2,
        flight_speed: 0.01,
        operating_points: vec![
            OperatingPoint {
                velocity: 0.01,
                rpm: 6500.0,
                min_thrust: Some(1.0),
            },
            OperatingPoint {
                velocity: 0.01,
                rpm: 9500.0,
                min_thrust: Some(3.0),
            },
        ],
        objectives: vec![ResultObjective {
            metric: ResultMetric::Efficiency,
            point: 0,
            direction: ObjectiveDirection::Maximise,
        }],
        timeout: 7.0,
        ..RotorEvaluatorArgs::default()
    })?;

    // chords first, then the twist angles
    let mut lower = vec![0.005; sections];
    lower.extend(vec![0.0; sections]);
    let mut upper = vec![0.04; sections];
    upper.extend(vec![22.0; sections]);
    let gene_space = GeneSpace::new(lower, upper)?;

    let args = NSGA3Arg {
        number_of_individuals: 200,
        number_of_partitions: NumberOfPartitions::OneLayer(12),
        stopping_condition: StoppingConditionType::MaxGeneration(MaxGenerationValue(300)),
        crossover_probability: 1.0,
        mutation_probability: 0.7,
        crossover_operator_options: Some(SimulatedBinaryCrossoverArgs {
            distribution_index: 10.0,
            ..SimulatedBinaryCrossoverArgs::default()
        }),
        mutation_operator_options: Some(PolynomialMutationArgs {
            index_parameter: 20.0,
            variable_probability: 1.0 / (2 * sections) as f64,
        }),
        gene_space,
        // run 4 solvers at the same time
        number_of_workers: Some(4),
        seed: None,
        export_artifacts: Some(ArtifactExport {
            destination: work_dir.clone(),
        }),
        statistics_file: Some(work_dir.join("stats.log")),
    };
    let mut algo = NSGA3::new(evaluator, args)?;

    let handle = algo.interrupt_handle();
    ctrlc::set_handler(move || {
        if handle.is_interrupted() {
            // a second Ctrl-C does not wait for the generation to end
            std::process::exit(130);
        }
        info!("Interrupt requested, stopping after the current generation");
        handle.interrupt();
    })?;

    let handle = algo.interrupt_handle();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines().map_while(Result::ok) {
            if line.trim() == "q" {
                info!("Interrupt requested");
                handle.interrupt();
                break;
            }
        }
    });

    let results = algo.run()?;
    if results.interrupted {
        info!(
            "Run interrupted after generation #{}",
            results.generation.saturating_sub(1)
        );
    }
    if let Some((_, best)) = results.population.champion() {
        info!(
            "Best design after {} generations: {:?} with objectives {:?}",
            results.generation,
            best.genes(),
            best.objective_values()?
        );
    }

    Ok(())
}
