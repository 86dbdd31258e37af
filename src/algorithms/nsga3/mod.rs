use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use rand::{Rng, RngCore};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

pub use selector::Nsga3Selector;

use crate::algorithms::{Algorithm, GenerationStatistics, Logbook, StoppingConditionType};
use crate::core::utils::get_rng;
use crate::core::{read_json_config, GeneSpace, Individual, OError, Population};
use crate::evaluation::{EvaluationId, Evaluator};
use crate::operators::{
    Crossover, Mutation, PolynomialMutation, PolynomialMutationArgs, SimulatedBinaryCrossover,
    SimulatedBinaryCrossoverArgs,
};
use crate::utils::{DasDarren1998, NumberOfPartitions};

mod associate;
mod niching;
mod normalise;
mod selector;

/// The name of the design written in the artifact files.
const ARTIFACT_DESIGN_NAME: &str = "bestRotor";

/// Where to write the designs of each generation. After each generation the champion is written
/// to `bestRotorgen{generation}.txt` and every individual to `bestRotor{k}.txt`, with `k` the
/// 1-based position in the population. The files are overwritten at each generation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ArtifactExport {
    /// The directory where the files are written. This must exist.
    pub destination: PathBuf,
}

/// Input arguments for the NSGA3 algorithm.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NSGA3Arg {
    /// The number of individuals in the population (`MU`).
    pub number_of_individuals: usize,
    /// The bounds of the genes.
    pub gene_space: GeneSpace,
    /// The number of partitions used to generate the reference points.
    pub number_of_partitions: NumberOfPartitions,
    /// The condition to use to terminate the algorithm.
    pub stopping_condition: StoppingConditionType,
    /// The probability that two consecutive individuals are mated (`CXPB`).
    pub crossover_probability: f64,
    /// The probability that an offspring is mutated (`MUTPB`).
    pub mutation_probability: f64,
    /// The options of the Simulated Binary Crossover (SBX) operator. This defaults to
    /// [`SimulatedBinaryCrossoverArgs::default()`].
    pub crossover_operator_options: Option<SimulatedBinaryCrossoverArgs>,
    /// The options to Polynomial Mutation (PM) operator. This defaults to
    /// [`PolynomialMutationArgs::default()`], with an index parameter of `20` and variable
    /// probability equal `1` divided by the number of genes.
    pub mutation_operator_options: Option<PolynomialMutationArgs>,
    /// The number of threads evaluating the individuals. When `None` this is the number of CPUs.
    pub number_of_workers: Option<usize>,
    /// The seed used in the random number generator (RNG). You can specify a seed in case you
    /// want to try to reproduce results. NSGA3 is a stochastic algorithm that relies on a RNG at
    /// different steps (when the population is initialised and in the variation operators);
    /// as such, it may lead to slightly different solutions. The seed is randomly picked if
    /// this is `None`.
    pub seed: Option<u64>,
    /// Export the designs of each generation.
    pub export_artifacts: Option<ArtifactExport>,
    /// The file the statistics of each generation are written to.
    pub statistics_file: Option<PathBuf>,
}

impl NSGA3Arg {
    /// Read the arguments from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `file`: The path to the JSON file.
    ///
    /// returns: `Result<NSGA3Arg, OError>`
    pub fn from_json_file(file: &Path) -> Result<Self, OError> {
        read_json_config(file)
    }
}

/// A handle to stop a running algorithm. The algorithm checks the handle between generations and
/// terminates returning the last completed population.
#[derive(Clone, Debug, Default)]
pub struct InterruptHandle(Arc<AtomicBool>);

impl InterruptHandle {
    /// Ask the algorithm to stop.
    pub fn interrupt(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether an interrupt was requested.
    ///
    /// returns: `bool`
    pub fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The Non-dominated Sorting Genetic Algorithm (NSGA3).
///
/// Implemented based on:
/// > K. Deb and H. Jain, "An Evolutionary Many-Objective Optimization Algorithm Using
/// > Reference-Point-Based Non-dominated Sorting Approach, Part I: Solving Problems With Box
/// > Constraints," in IEEE Transactions on Evolutionary Computation, vol. 18, no. 4, pp. 577-601,
/// > Aug. 2014, doi: 10.1109/TEVC.2013.2281535.
///
/// At each generation the offspring are created from a copy of the population: consecutive
/// pairs are mated with the crossover probability and each offspring is mutated with the
/// mutation probability. Only new offspring are evaluated; this is done in parallel. The next
/// population is selected from parents and offspring with [`Nsga3Selector`].
///
/// # Example
/// ```
/// use optirotor::algorithms::{Algorithm, MaxGenerationValue, NSGA3, NSGA3Arg, StoppingConditionType};
/// use optirotor::core::{GeneSpace, OError};
/// use optirotor::evaluation::{EvaluationId, Evaluator};
/// use optirotor::utils::NumberOfPartitions;
///
/// #[derive(Debug)]
/// struct SCHEvaluator;
/// impl Evaluator for SCHEvaluator {
///     fn number_of_objectives(&self) -> usize {
///         2
///     }
///     fn evaluate(&self, genes: &[f64], _id: &EvaluationId) -> Result<Vec<f64>, OError> {
///         Ok(vec![genes[0].powi(2), (genes[0] - 2.0).powi(2)])
///     }
/// }
///
/// let args = NSGA3Arg {
///     number_of_individuals: 20,
///     gene_space: GeneSpace::uniform(1, -1000.0, 1000.0).unwrap(),
///     number_of_partitions: NumberOfPartitions::OneLayer(12),
///     stopping_condition: StoppingConditionType::MaxGeneration(MaxGenerationValue(10)),
///     crossover_probability: 0.9,
///     mutation_probability: 0.5,
///     crossover_operator_options: None,
///     mutation_operator_options: None,
///     number_of_workers: Some(2),
///     seed: Some(1),
///     export_artifacts: None,
///     statistics_file: None,
/// };
/// let mut algo = NSGA3::new(SCHEvaluator, args).unwrap();
/// let results = algo.run().unwrap();
/// assert_eq!(results.population.len(), 20);
/// ```
pub struct NSGA3<E: Evaluator> {
    /// The algorithm options.
    args: NSGA3Arg,
    /// The function evaluating the individuals.
    evaluator: E,
    /// The number of objectives returned by the evaluator.
    number_of_objectives: usize,
    /// The environmental selection.
    selector: Nsga3Selector,
    /// The SBX operator to use to generate new children by recombining the genes of parents.
    crossover_operator: SimulatedBinaryCrossover,
    /// The PM operator to use to mutate the genes of an individual.
    mutation_operator: PolynomialMutation,
    /// The current population.
    population: Population,
    /// The current generation.
    generation: usize,
    /// The number of function evaluations.
    nfe: usize,
    /// The time when the algorithm started.
    start_time: DateTime<Local>,
    /// The random number generator.
    rng: Box<dyn RngCore + Send>,
    /// The threads evaluating the individuals.
    thread_pool: ThreadPool,
    /// The statistics of each generation.
    logbook: Logbook,
    /// The interrupt flag.
    interrupt: InterruptHandle,
}

impl<E: Evaluator> Debug for NSGA3<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NSGA3")
            .field("args", &self.args)
            .field("evaluator", &self.evaluator)
            .field("generation", &self.generation)
            .field("nfe", &self.nfe)
            .finish()
    }
}

impl<E: Evaluator> NSGA3<E> {
    /// Initialise the NSGA3 algorithm.
    ///
    /// # Arguments
    ///
    /// * `evaluator`: The function evaluating the objectives of new individuals.
    /// * `options`: The [`NSGA3Arg`] arguments to customise the algorithm behaviour.
    ///
    /// returns: `Result<NSGA3, OError>`.
    pub fn new(evaluator: E, options: NSGA3Arg) -> Result<Self, OError> {
        let name = "NSGA3".to_string();
        if options.number_of_individuals < 2 {
            return Err(OError::AlgorithmInit(
                name,
                "The population size must have at least 2 individuals".to_string(),
            ));
        }
        for (label, p) in [
            ("crossover", options.crossover_probability),
            ("mutation", options.mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(OError::AlgorithmInit(
                    name,
                    format!("The {label} probability ({p}) must be a number between 0 and 1"),
                ));
            }
        }
        options.gene_space.validate()?;

        let number_of_objectives = evaluator.number_of_objectives();
        if number_of_objectives == 0 {
            return Err(OError::AlgorithmInit(
                name,
                "The evaluator must return at least one objective".to_string(),
            ));
        }

        if let Some(n) = evaluator.expected_number_of_genes() {
            if n != options.gene_space.number_of_genes() {
                return Err(OError::AlgorithmInit(
                    name,
                    format!(
                        "The evaluator expects {n} genes but the gene space has {}",
                        options.gene_space.number_of_genes()
                    ),
                ));
            }
        }

        let ref_points = DasDarren1998::new(number_of_objectives, &options.number_of_partitions)?;
        let number_of_points = ref_points.number_of_points();
        if number_of_points > options.number_of_individuals as u64 {
            warn!(
                "The number of reference points ({number_of_points}) is larger than the population size ({})",
                options.number_of_individuals
            );
        }
        let selector = Nsga3Selector::new(ref_points.get_weights())?;

        let mutation_options = match &options.mutation_operator_options {
            Some(o) => o.clone(),
            None => PolynomialMutationArgs::default(&options.gene_space),
        };
        let mutation_operator = PolynomialMutation::new(mutation_options.clone())?;

        let crossover_options = options
            .crossover_operator_options
            .clone()
            .unwrap_or_default();
        let crossover_operator = SimulatedBinaryCrossover::new(crossover_options.clone())?;

        let mut builder = ThreadPoolBuilder::new();
        match options.number_of_workers {
            Some(0) => {
                return Err(OError::AlgorithmInit(
                    name,
                    "The number of workers must be at least 1".to_string(),
                ))
            }
            Some(n) => builder = builder.num_threads(n),
            None => {}
        }
        let thread_pool = builder
            .build()
            .map_err(|e| OError::AlgorithmInit(name.clone(), e.to_string()))?;

        if let Some(export) = &options.export_artifacts {
            if !export.destination.is_dir() {
                return Err(OError::AlgorithmInit(
                    name,
                    format!(
                        "The artifact destination {:?} is not a directory",
                        export.destination
                    ),
                ));
            }
        }
        let logbook = Logbook::new(options.statistics_file.as_deref())?;

        info!(
            "{}",
            Self::algorithm_option_str(
                &options,
                number_of_objectives,
                number_of_points,
                &crossover_options,
                &mutation_options,
                thread_pool.current_num_threads()
            )
        );

        Ok(Self {
            rng: get_rng(options.seed),
            args: options,
            evaluator,
            number_of_objectives,
            selector,
            crossover_operator,
            mutation_operator,
            population: Population::new(),
            generation: 0,
            nfe: 0,
            start_time: Local::now(),
            thread_pool,
            logbook,
            interrupt: InterruptHandle::default(),
        })
    }

    /// Get a string listing the algorithm options.
    fn algorithm_option_str(
        options: &NSGA3Arg,
        number_of_objectives: usize,
        number_of_points: u64,
        crossover_options: &SimulatedBinaryCrossoverArgs,
        mutation_options: &PolynomialMutationArgs,
        workers: usize,
    ) -> String {
        let mut log_opts: String = "Algorithm options are:\n".to_owned();
        log_opts.push_str(
            format!(
                "\t* Number of genes {:>17}\n\t* Number of objectives {:>12}\n\t* Number of reference points {:>6}\n\t* Population size {:>17}\n\t* Workers {:>25}\n",
                options.gene_space.number_of_genes(),
                number_of_objectives,
                number_of_points,
                options.number_of_individuals,
                workers
            )
            .as_str(),
        );
        log_opts.push_str(
            format!(
                "\t* Crossover distribution index {:>5}\n\t* Crossover probability {:>11}\n\t* Crossover var probability {:>7}\n",
                crossover_options.distribution_index,
                options.crossover_probability,
                crossover_options.variable_probability,
            )
            .as_str(),
        );
        log_opts.push_str(
            format!(
                "\t* Mutation index parameter {:>8}\n\t* Mutation probability {:>12}\n\t* Mutation var probability {:>8.4}",
                mutation_options.index_parameter,
                options.mutation_probability,
                mutation_options.variable_probability,
            )
            .as_str(),
        );
        log_opts
    }

    /// A handle to stop the algorithm from another thread. The algorithm stops before starting
    /// the next generation.
    ///
    /// returns: `InterruptHandle`
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.clone()
    }

    /// The statistics of the completed generations.
    ///
    /// returns: `&Logbook`
    pub fn logbook(&self) -> &Logbook {
        &self.logbook
    }

    /// The evaluator.
    ///
    /// returns: `&E`
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Evaluate the individuals that have not been evaluated yet using the thread pool. This
    /// returns an error if the evaluator fails or returns the wrong number of objectives.
    ///
    /// # Arguments
    ///
    /// * `thread_pool`: The threads to use.
    /// * `evaluator`: The evaluator.
    /// * `number_of_objectives`: The expected number of objectives.
    /// * `generation`: The current generation.
    /// * `individuals`: The individuals to evaluate.
    ///
    /// returns: `Result<usize, OError>`: the number of evaluated individuals.
    fn do_parallel_evaluation(
        thread_pool: &ThreadPool,
        evaluator: &E,
        number_of_objectives: usize,
        generation: usize,
        individuals: &mut [Individual],
    ) -> Result<usize, OError> {
        let mut invalid: Vec<&mut Individual> = individuals
            .iter_mut()
            .filter(|i| !i.is_evaluated())
            .collect();
        let count = invalid.len();
        debug!("Evaluating {count} individuals");

        thread_pool.install(|| {
            invalid
                .par_iter_mut()
                .enumerate()
                .try_for_each(|(idx, ind)| {
                    let id = EvaluationId::new(generation, idx);
                    let objectives = evaluator.evaluate(ind.genes(), &id)?;
                    if objectives.len() != number_of_objectives {
                        return Err(OError::Evaluation(format!(
                            "The evaluator returned {} objectives for {id} but {number_of_objectives} were expected",
                            objectives.len()
                        )));
                    }
                    ind.set_fitness(objectives)
                })
        })?;
        Ok(count)
    }

    /// Record the statistics of the current population.
    fn record_statistics(&mut self, evaluations: usize) -> Result<(), OError> {
        let stats =
            GenerationStatistics::new(self.generation, evaluations, self.population.individuals())?;
        self.logbook.record(stats)
    }

    /// Write the champion and all the individuals of the current population to the artifact
    /// directory.
    fn export_artifacts(&self) -> Result<(), OError> {
        let Some(export) = &self.args.export_artifacts else {
            return Ok(());
        };
        let to_export_error =
            |e: OError| OError::AlgorithmExport(format!("cannot write the design file: {e}"));

        if let Some((idx, champion)) = self.population.champion() {
            let file = export
                .destination
                .join(format!("bestRotorgen{}.txt", self.generation));
            debug!("Exporting champion #{idx} to {:?}", file);
            self.evaluator
                .export_design(champion.genes(), ARTIFACT_DESIGN_NAME, &file)
                .map_err(to_export_error)?;
        }
        for (k, individual) in self.population.individuals().iter().enumerate() {
            let file = export.destination.join(format!("bestRotor{}.txt", k + 1));
            self.evaluator
                .export_design(individual.genes(), ARTIFACT_DESIGN_NAME, &file)
                .map_err(to_export_error)?;
        }
        Ok(())
    }

    /// Create the offspring from a copy of the population. Consecutive pairs are mated with the
    /// crossover probability and each offspring is then mutated with the mutation probability.
    /// Offspring that are not changed keep the fitness of their parent.
    ///
    /// returns: `Result<Vec<Individual>, OError>`
    fn generate_offspring(&mut self) -> Result<Vec<Individual>, OError> {
        let space = &self.args.gene_space;
        let mut offspring: Vec<Individual> = self.population.individuals().to_vec();

        for i in (1..offspring.len()).step_by(2) {
            if self.rng.gen::<f64>() < self.args.crossover_probability {
                let children = self.crossover_operator.generate_offsprings(
                    offspring[i - 1].genes(),
                    offspring[i].genes(),
                    space,
                    self.rng.as_mut(),
                )?;
                offspring[i - 1] = Individual::new(children.child1);
                offspring[i] = Individual::new(children.child2);
            }
        }

        for individual in offspring.iter_mut() {
            if self.rng.gen::<f64>() < self.args.mutation_probability {
                let genes =
                    self.mutation_operator
                        .mutate_offspring(individual.genes(), space, self.rng.as_mut())?;
                *individual = Individual::new(genes);
            }
        }
        Ok(offspring)
    }
}

impl<E: Evaluator> Algorithm for NSGA3<E> {
    /// Generate and evaluate the initial random population.
    fn initialise(&mut self) -> Result<(), OError> {
        self.start_time = Local::now();
        self.generation = 0;
        self.population = Population::init(
            &self.args.gene_space,
            self.args.number_of_individuals,
            self.rng.as_mut(),
        );
        info!("Created initial random population");

        let evaluations = Self::do_parallel_evaluation(
            &self.thread_pool,
            &self.evaluator,
            self.number_of_objectives,
            self.generation,
            self.population.individuals_as_mut(),
        )?;
        self.nfe += evaluations;

        self.record_statistics(evaluations)?;
        self.export_artifacts()?;
        info!("Initial evaluation completed");
        self.generation += 1;
        Ok(())
    }

    fn evolve(&mut self) -> Result<(), OError> {
        debug!("Generating offspring (crossover + mutation)");
        let mut offspring = self.generate_offspring()?;

        let evaluations = Self::do_parallel_evaluation(
            &self.thread_pool,
            &self.evaluator,
            self.number_of_objectives,
            self.generation,
            &mut offspring,
        )?;
        self.nfe += evaluations;

        debug!("Selecting the new population from parents and offspring");
        self.population.add_new_individuals(offspring);
        if self.population.number_of_invalid() > 0 {
            return Err(OError::AlgorithmRun(
                self.name(),
                "Some offspring were not evaluated".to_string(),
            ));
        }
        let pool = self.population.drain(..);
        let selected = self.selector.select(pool, self.args.number_of_individuals)?;
        self.population = Population::new_with(selected);

        self.record_statistics(evaluations)?;
        self.export_artifacts()?;
        self.generation += 1;
        Ok(())
    }

    fn generation(&self) -> usize {
        self.generation
    }

    fn number_of_function_evaluations(&self) -> usize {
        self.nfe
    }

    fn name(&self) -> String {
        "NSGA3".to_string()
    }

    fn start_time(&self) -> DateTime<Local> {
        self.start_time
    }

    fn stopping_condition(&self) -> StoppingConditionType {
        self.args.stopping_condition.clone()
    }

    fn population(&self) -> Population {
        self.population.clone()
    }

    fn is_interrupted(&self) -> bool {
        self.interrupt.is_interrupted()
    }
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::algorithms::{
        Algorithm, ArtifactExport, MaxGenerationValue, NSGA3Arg, StoppingConditionType, NSGA3,
    };
    use crate::core::{GeneSpace, OError};
    use crate::evaluation::{EvaluationId, Evaluator};
    use crate::utils::NumberOfPartitions;

    /// Minimise the distance from a target point. The first objective is the squared distance,
    /// the second the sum of the genes.
    #[derive(Debug, Default)]
    struct DistanceEvaluator {
        calls: AtomicUsize,
    }

    impl Evaluator for DistanceEvaluator {
        fn number_of_objectives(&self) -> usize {
            2
        }

        fn evaluate(&self, genes: &[f64], _id: &EvaluationId) -> Result<Vec<f64>, OError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let d = genes.iter().map(|g| (g - 0.3).powi(2)).sum();
            Ok(vec![d, genes.iter().sum()])
        }

        fn export_design(&self, genes: &[f64], name: &str, file: &Path) -> Result<(), OError> {
            fs::write(file, format!("{name} {:?}", genes))
                .map_err(|e| OError::Generic(e.to_string()))
        }
    }

    fn args(generations: usize) -> NSGA3Arg {
        NSGA3Arg {
            number_of_individuals: 12,
            gene_space: GeneSpace::uniform(3, 0.0, 1.0).unwrap(),
            number_of_partitions: NumberOfPartitions::OneLayer(6),
            stopping_condition: StoppingConditionType::MaxGeneration(MaxGenerationValue(
                generations,
            )),
            crossover_probability: 0.9,
            mutation_probability: 0.5,
            crossover_operator_options: None,
            mutation_operator_options: None,
            number_of_workers: Some(2),
            seed: Some(10),
            export_artifacts: None,
            statistics_file: None,
        }
    }

    #[test]
    /// Run a few generations and check the counters, the statistics and the bounds.
    fn test_run() {
        let mut algo = NSGA3::new(DistanceEvaluator::default(), args(5)).unwrap();
        let results = algo.run().unwrap();

        assert!(!results.interrupted);
        assert_eq!(results.generation, 5);
        assert_eq!(results.population.len(), 12);
        assert_eq!(
            results.evaluations,
            algo.evaluator().calls.load(Ordering::SeqCst)
        );
        assert!(results.evaluations >= 12);

        let records = algo.logbook().records();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].generation, 0);
        assert_eq!(records[0].evaluations, 12);
        assert_eq!(
            records.iter().map(|r| r.evaluations).sum::<usize>(),
            results.evaluations
        );

        let space = GeneSpace::uniform(3, 0.0, 1.0).unwrap();
        for ind in results.population.individuals() {
            assert!(ind.is_evaluated());
            assert!(space.contains(ind.genes()));
        }
    }

    /// The sphere function with one objective.
    #[derive(Debug)]
    struct SphereEvaluator;

    impl Evaluator for SphereEvaluator {
        fn number_of_objectives(&self) -> usize {
            1
        }

        fn evaluate(&self, genes: &[f64], _id: &EvaluationId) -> Result<Vec<f64>, OError> {
            Ok(vec![genes.iter().map(|g| g.powi(2)).sum()])
        }
    }

    #[test]
    /// The best value found can only improve because parents are kept in the selection pool.
    fn test_elitism() {
        let mut options = args(15);
        options.gene_space = GeneSpace::uniform(3, -1.0, 1.0).unwrap();
        let mut algo = NSGA3::new(SphereEvaluator, options).unwrap();
        algo.run().unwrap();
        let min_values: Vec<f64> = algo
            .logbook()
            .records()
            .iter()
            .map(|r| r.min[0])
            .collect();
        assert_eq!(min_values.len(), 15);
        for w in min_values.windows(2) {
            assert!(w[1] <= w[0]);
        }
    }

    #[test]
    /// The same seed gives the same population.
    fn test_seed() {
        let mut a = NSGA3::new(DistanceEvaluator::default(), args(4)).unwrap();
        let mut b = NSGA3::new(DistanceEvaluator::default(), args(4)).unwrap();
        let ra = a.run().unwrap();
        let rb = b.run().unwrap();
        assert_eq!(ra.population.individuals(), rb.population.individuals());
    }

    #[test]
    /// The interrupt stops the algorithm after the initial population.
    fn test_interrupt() {
        let mut algo = NSGA3::new(DistanceEvaluator::default(), args(100)).unwrap();
        algo.interrupt_handle().interrupt();
        let results = algo.run().unwrap();
        assert!(results.interrupted);
        assert_eq!(results.generation, 1);
        assert_eq!(results.evaluations, 12);
        assert_eq!(results.population.len(), 12);
    }

    #[test]
    /// The designs and the statistics are written to files.
    fn test_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        #[derive(Debug)]
        struct TwoGenes;
        impl Evaluator for TwoGenes {
            fn number_of_objectives(&self) -> usize {
                1
            }
            fn expected_number_of_genes(&self) -> Option<usize> {
                Some(2)
            }
            fn evaluate(&self, genes: &[f64], _id: &EvaluationId) -> Result<Vec<f64>, OError> {
                Ok(vec![genes[0]])
            }
        }
        assert!(matches!(
            NSGA3::new(TwoGenes, args(2)),
            Err(OError::AlgorithmInit(_, _))
        ));

        let mut options = args(2);
        options.export_artifacts = Some(ArtifactExport {
            destination: dir.path().to_path_buf(),
        });
        let stats_file = dir.path().join("stats.log");
        options.statistics_file = Some(stats_file.clone());

        let mut algo = NSGA3::new(DistanceEvaluator::default(), options).unwrap();
        let results = algo.run().unwrap();

        assert!(dir.path().join("bestRotorgen0.txt").exists());
        assert!(dir.path().join("bestRotorgen1.txt").exists());
        assert!(!dir.path().join("bestRotorgen2.txt").exists());
        assert!(dir.path().join("bestRotor1.txt").exists());
        assert!(dir.path().join("bestRotor12.txt").exists());
        assert!(!dir.path().join("bestRotor13.txt").exists());

        // the champion has the smallest first objective
        let (_, champion) = results.population.champion().unwrap();
        let content = fs::read_to_string(dir.path().join("bestRotorgen1.txt")).unwrap();
        assert_eq!(content, format!("bestRotor {:?}", champion.genes()));

        let stats = fs::read_to_string(stats_file).unwrap();
        assert_eq!(stats.lines().count(), 3);
    }

    #[test]
    /// Invalid options are rejected.
    fn test_new_errors() {
        let mut options = args(2);
        options.number_of_individuals = 1;
        assert!(NSGA3::new(DistanceEvaluator::default(), options).is_err());

        let mut options = args(2);
        options.crossover_probability = 1.5;
        assert!(NSGA3::new(DistanceEvaluator::default(), options).is_err());

        let mut options = args(2);
        options.number_of_workers = Some(0);
        assert!(NSGA3::new(DistanceEvaluator::default(), options).is_err());

        let mut options = args(2);
        options.number_of_partitions = NumberOfPartitions::OneLayer(0);
        assert!(NSGA3::new(DistanceEvaluator::default(), options).is_err());

        let mut options = args(2);
        options.export_artifacts = Some(ArtifactExport {
            destination: "/this/path/does/not/exist".into(),
        });
        assert!(NSGA3::new(DistanceEvaluator::default(), options).is_err());
    }

    #[test]
    /// Read the options from a JSON file.
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nsga3.json");
        fs::write(&file, serde_json::to_string(&args(300)).unwrap()).unwrap();

        let options = NSGA3Arg::from_json_file(&file).unwrap();
        assert_eq!(options.number_of_individuals, 12);
        assert_eq!(
            options.stopping_condition,
            StoppingConditionType::MaxGeneration(MaxGenerationValue(300))
        );
    }
}
