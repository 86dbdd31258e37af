use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::{read_json_config, OError};
use crate::evaluation::{EvaluationId, Evaluator, ScopedFiles};
use crate::model::RotorModel;
use crate::solver::{
    ResultColumn, ResultTable, ResultTableLayout, SolverError, SolverProcess, SolverScript,
};

/// Whether an objective should be minimised or maximised. Default is minimise.
#[derive(Serialize, Deserialize, Default, Clone, Copy, Debug, PartialEq)]
pub enum ObjectiveDirection {
    #[default]
    /// Minimise an objective.
    Minimise,
    /// Maximise an objective.
    Maximise,
}

impl ObjectiveDirection {
    /// The factor turning the quantity into a value to minimise.
    fn sign(&self) -> f64 {
        match self {
            ObjectiveDirection::Minimise => 1.0,
            ObjectiveDirection::Maximise => -1.0,
        }
    }
}

impl Display for ObjectiveDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectiveDirection::Minimise => f.write_str("minimised"),
            ObjectiveDirection::Maximise => f.write_str("maximised"),
        }
    }
}

/// A quantity read from the solver result table.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum ResultMetric {
    /// The rotor efficiency.
    Efficiency,
    /// The rotor thrust.
    Thrust,
}

/// One objective channel: a metric at an operating point.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ResultObjective {
    /// The metric to read.
    pub metric: ResultMetric,
    /// The index of the operating point in [`RotorEvaluatorArgs::operating_points`].
    pub point: usize,
    /// Whether the metric is minimised or maximised.
    pub direction: ObjectiveDirection,
}

impl Display for ResultObjective {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} at operating point #{} is {}",
            self.metric, self.point, self.direction
        )
    }
}

/// A condition the rotor is analysed at.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OperatingPoint {
    /// The inflow velocity in m/s.
    pub velocity: f64,
    /// The rotational speed in rpm.
    pub rpm: f64,
    /// The minimum thrust the rotor must produce at this point. A lower thrust is penalised.
    pub min_thrust: Option<f64>,
}

/// The penalties added to the objectives.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PenaltyArgs {
    /// The penalty added for each unit of thrust below the minimum thrust.
    pub constraint_weight: f64,
    /// The metric value used when the solver fails.
    pub failure_value: f64,
    /// The penalty added to all objectives when the solver fails.
    pub failure_penalty: f64,
}

impl Default for PenaltyArgs {
    fn default() -> Self {
        Self {
            constraint_weight: 1.0,
            failure_value: 0.0,
            failure_penalty: 10.0,
        }
    }
}

/// Input arguments for the [`RotorEvaluator`]. The default values describe a two-bladed rotor
/// with six sections analysed at one operating point, whose efficiency is maximised.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RotorEvaluatorArgs {
    /// The solver executable.
    pub solver: PathBuf,
    /// The arguments passed to the solver executable.
    pub solver_args: Vec<String>,
    /// The directory the solver runs in. Temporary model and result files are created here and
    /// the polar file path is relative to it.
    pub work_dir: PathBuf,
    /// The file with the section aerodynamic data. When `None` the solver defaults are used.
    pub polar_file: Option<PathBuf>,
    /// The rotor tip radius.
    pub tip_radius: f64,
    /// The rotor hub radius.
    pub hub_radius: f64,
    /// The position of each blade section as a fraction of the tip radius.
    pub radius_ratios: Vec<f64>,
    /// The number of blades.
    pub blade_count: usize,
    /// The design flight speed in m/s.
    pub flight_speed: f64,
    /// The fluid density. When `None` the solver default is used.
    pub density: Option<f64>,
    /// The number of radial stations used by the solver. When `None` the solver default is used.
    pub radial_stations: Option<usize>,
    /// The operating points to analyse.
    pub operating_points: Vec<OperatingPoint>,
    /// The objective channels.
    pub objectives: Vec<ResultObjective>,
    /// The time in seconds after which the solver is stopped and the evaluation fails.
    pub timeout: f64,
    /// The layout of the result file.
    pub result_layout: ResultTableLayout,
    /// The penalty values.
    pub penalty: PenaltyArgs,
}

impl Default for RotorEvaluatorArgs {
    fn default() -> Self {
        Self {
            solver: PathBuf::from("xrotor"),
            solver_args: Vec::new(),
            work_dir: PathBuf::from("."),
            polar_file: None,
            tip_radius: 0.15,
            hub_radius: 0.01,
            radius_ratios: vec![0.1, 0.3, 0.5, 0.7, 0.9, 1.0],
            blade_count: 2,
            flight_speed: 0.0,
            density: Some(1.226e-2),
            radial_stations: None,
            operating_points: vec![OperatingPoint {
                velocity: 0.1,
                rpm: 2000.0,
                min_thrust: Some(3.0),
            }],
            objectives: vec![ResultObjective {
                metric: ResultMetric::Efficiency,
                point: 0,
                direction: ObjectiveDirection::Maximise,
            }],
            timeout: 7.0,
            result_layout: ResultTableLayout::default(),
            penalty: PenaltyArgs::default(),
        }
    }
}

impl RotorEvaluatorArgs {
    /// Read the arguments from a JSON file. Missing fields take their default value.
    ///
    /// # Arguments
    ///
    /// * `file`: The path to the JSON file.
    ///
    /// returns: `Result<RotorEvaluatorArgs, OError>`
    pub fn from_json_file(file: &Path) -> Result<Self, OError> {
        read_json_config(file)
    }
}

/// Evaluate a rotor blade design with the external solver.
///
/// The genes are decoded into a blade geometry: the first half contains the chord of each
/// section and the second half the twist angles. The model file is written to the working
/// directory, the solver analyses all the operating points and the objectives are read from its
/// result file. A design the solver cannot analyse (because it crashes, times out or writes an
/// incomplete result) is not an error: it gets the failure objective.
#[derive(Debug)]
pub struct RotorEvaluator {
    /// The evaluator arguments.
    args: RotorEvaluatorArgs,
    /// The solver runner.
    process: SolverProcess,
    /// The solver timeout.
    timeout: Duration,
    /// The token added to the temporary file names. This is different for each evaluator in
    /// a process and for processes running at the same time.
    run_token: String,
}

/// The number of evaluators created in this process.
static EVALUATOR_COUNT: AtomicUsize = AtomicUsize::new(0);

impl RotorEvaluator {
    /// Create the evaluator. This returns an error if the arguments are not consistent.
    ///
    /// # Arguments
    ///
    /// * `args`: The evaluator arguments.
    ///
    /// returns: `Result<RotorEvaluator, OError>`
    pub fn new(args: RotorEvaluatorArgs) -> Result<Self, OError> {
        let name = "RotorEvaluator".to_string();
        if args.radius_ratios.is_empty() {
            return Err(OError::AlgorithmInit(
                name,
                "at least one blade section is needed".to_string(),
            ));
        }
        if args.tip_radius.is_nan()
            || args.tip_radius <= 0.0
            || args.hub_radius < 0.0
            || args.hub_radius >= args.tip_radius
        {
            return Err(OError::AlgorithmInit(
                name,
                format!(
                    "the hub radius ({}) must be positive and smaller than the tip radius ({})",
                    args.hub_radius, args.tip_radius
                ),
            ));
        }
        if args.blade_count == 0 {
            return Err(OError::AlgorithmInit(
                name,
                "the rotor must have at least one blade".to_string(),
            ));
        }
        if args.operating_points.is_empty() {
            return Err(OError::AlgorithmInit(
                name,
                "at least one operating point is needed".to_string(),
            ));
        }
        if args.objectives.is_empty() {
            return Err(OError::AlgorithmInit(
                name,
                "at least one objective is needed".to_string(),
            ));
        }
        if let Some(o) = args
            .objectives
            .iter()
            .find(|o| o.point >= args.operating_points.len())
        {
            return Err(OError::AlgorithmInit(
                name,
                format!(
                    "the objective '{o}' refers to a missing operating point. Only {} points are defined",
                    args.operating_points.len()
                ),
            ));
        }
        if !args.timeout.is_finite() || args.timeout <= 0.0 {
            return Err(OError::AlgorithmInit(
                name,
                format!("the timeout ({}) must be a positive number", args.timeout),
            ));
        }
        if !args.work_dir.is_dir() {
            return Err(OError::AlgorithmInit(
                name,
                format!("the working directory {:?} does not exist", args.work_dir),
            ));
        }

        let process = SolverProcess::new(&args.solver)
            .with_args(args.solver_args.clone())
            .with_working_dir(&args.work_dir);
        let timeout = Duration::from_secs_f64(args.timeout);
        let run_token = format!(
            "p{}r{}",
            std::process::id(),
            EVALUATOR_COUNT.fetch_add(1, Ordering::SeqCst)
        );
        debug!("Initialised the rotor evaluator {run_token} with {:?}", args);

        Ok(Self {
            args,
            process,
            timeout,
            run_token,
        })
    }

    /// The number of genes a design must have: one chord and one twist angle for each section.
    ///
    /// returns: `usize`
    pub fn number_of_genes(&self) -> usize {
        2 * self.args.radius_ratios.len()
    }

    /// The evaluator arguments.
    pub fn args(&self) -> &RotorEvaluatorArgs {
        &self.args
    }

    /// Convert the genes into the rotor geometry.
    ///
    /// # Arguments
    ///
    /// * `genes`: The chords followed by the twist angles.
    /// * `name`: The rotor name.
    ///
    /// returns: `Result<RotorModel, OError>`
    pub fn decode(&self, genes: &[f64], name: &str) -> Result<RotorModel, OError> {
        if genes.len() != self.number_of_genes() {
            return Err(OError::Evaluation(format!(
                "the design has {} genes but {} are needed",
                genes.len(),
                self.number_of_genes()
            )));
        }
        let (chords, betas) = genes.split_at(self.args.radius_ratios.len());
        let radii = self
            .args
            .radius_ratios
            .iter()
            .map(|r| r * self.args.tip_radius)
            .collect();
        RotorModel::new(
            name,
            self.args.tip_radius,
            self.args.hub_radius,
            radii,
            chords.to_vec(),
            betas.to_vec(),
        )
    }

    /// The objectives of a design the solver could not analyse.
    ///
    /// returns: `Vec<f64>`
    pub fn failure_objectives(&self) -> Vec<f64> {
        let p = &self.args.penalty;
        self.args
            .objectives
            .iter()
            .map(|o| o.direction.sign() * p.failure_value + p.failure_penalty)
            .collect()
    }

    /// Build the solver commands analysing all the operating points.
    fn build_script(&self, model_file: &Path, result_file: &Path) -> SolverScript {
        let mut script = SolverScript::new();
        if let Some(polar) = &self.args.polar_file {
            script.load_polar(polar);
        }
        script.load_model(model_file, self.args.blade_count, self.args.flight_speed);
        if let Some(density) = self.args.density {
            script.set_density(density);
        }
        if let Some(n) = self.args.radial_stations {
            script.set_radial_stations(n);
        }
        for point in &self.args.operating_points {
            script.run_operating_point(point.velocity, point.rpm);
        }
        script.dump_results(result_file);
        script
    }

    /// The result column containing a metric.
    fn column(&self, metric: ResultMetric) -> ResultColumn {
        match metric {
            ResultMetric::Efficiency => self.args.result_layout.efficiency_column,
            ResultMetric::Thrust => self.args.result_layout.thrust_column,
        }
    }

    /// Calculate the objectives from the result table.
    fn objectives_from_table(&self, table: &ResultTable) -> Result<Vec<f64>, SolverError> {
        let mut penalty = 0.0;
        for (row, point) in self.args.operating_points.iter().enumerate() {
            if let Some(min_thrust) = point.min_thrust {
                let thrust = table.value(row, self.column(ResultMetric::Thrust))?;
                if thrust < min_thrust {
                    penalty += self.args.penalty.constraint_weight * (min_thrust - thrust);
                }
            }
        }

        self.args
            .objectives
            .iter()
            .map(|o| {
                let value = table.value(o.point, self.column(o.metric))?;
                Ok(o.direction.sign() * value + penalty)
            })
            .collect()
    }

    /// The stem of the temporary file names of an evaluation.
    ///
    /// returns: `String`
    fn temp_file_stem(&self, id: &EvaluationId) -> String {
        format!("{}_{}", self.run_token, id.file_stem())
    }

    /// Run the solver on a design and read its objectives.
    fn analyse(&self, genes: &[f64], id: &EvaluationId) -> Result<Vec<f64>, SolverError> {
        let stem = self.temp_file_stem(id);
        let model_name = format!("rotor_{stem}");
        let result_name = format!("res_{stem}");

        // stale files are removed now and the new ones on every exit path
        let mut files = ScopedFiles::new();
        let model_path = files
            .track(self.args.work_dir.join(&model_name))
            .map_err(|e| SolverError::Io(e.to_string()))?;
        let result_path = files
            .track(self.args.work_dir.join(&result_name))
            .map_err(|e| SolverError::Io(e.to_string()))?;

        let model = self
            .decode(genes, &format!("dumrotor_{}", id.file_stem()))
            .map_err(|e| SolverError::Io(e.to_string()))?;
        model
            .write_file(&model_path)
            .map_err(|e| SolverError::Io(e.to_string()))?;

        // the solver runs in the working directory
        let script = self.build_script(Path::new(&model_name), Path::new(&result_name));
        let output = self.process.execute(&script, self.timeout)?;
        if output.exit_code != Some(0) {
            debug!(
                "The solver exited with code {:?} for {id}. Stderr: {}",
                output.exit_code,
                output.stderr.trim()
            );
        }

        let table = ResultTable::from_file(
            &result_path,
            &self.args.result_layout,
            self.args.operating_points.len(),
        )?;
        self.objectives_from_table(&table)
    }
}

impl Evaluator for RotorEvaluator {
    fn number_of_objectives(&self) -> usize {
        self.args.objectives.len()
    }

    fn expected_number_of_genes(&self) -> Option<usize> {
        Some(self.number_of_genes())
    }

    fn evaluate(&self, genes: &[f64], id: &EvaluationId) -> Result<Vec<f64>, OError> {
        if genes.len() != self.number_of_genes() {
            return Err(OError::Evaluation(format!(
                "the design of {id} has {} genes but {} are needed",
                genes.len(),
                self.number_of_genes()
            )));
        }

        match self.analyse(genes, id) {
            Ok(objectives) => {
                debug!("Evaluated {id}: {:?}", objectives);
                Ok(objectives)
            }
            Err(e) => {
                warn!("The rotor analysis of {id} failed: {e}");
                Ok(self.failure_objectives())
            }
        }
    }

    fn export_design(&self, genes: &[f64], name: &str, file: &Path) -> Result<(), OError> {
        self.decode(genes, name)?.write_file(file)
    }
}
