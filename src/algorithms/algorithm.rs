use chrono::{DateTime, Local};
use log::{info, warn};
use serde::Serialize;

use crate::algorithms::StoppingConditionType;
use crate::core::{OError, Population};

/// The elapsed time.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Elapsed {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// The outcome of [`Algorithm::run`].
#[derive(Debug, Clone)]
pub struct RunResults {
    /// The last population.
    pub population: Population,
    /// The number of completed generations, including the initial population.
    pub generation: usize,
    /// The number of function evaluations.
    pub evaluations: usize,
    /// Whether the run was stopped by an interrupt before the stopping condition was met.
    pub interrupted: bool,
    /// The time when the algorithm started.
    pub started_at: DateTime<Local>,
    /// The duration of the run.
    pub took: Elapsed,
}

/// The trait to use to implement an algorithm.
pub trait Algorithm {
    /// Initialise the algorithm.
    ///
    /// return: `Result<(), OError>`
    fn initialise(&mut self) -> Result<(), OError>;

    /// Evolve the population.
    ///
    /// return: `Result<(), OError>`
    fn evolve(&mut self) -> Result<(), OError>;

    /// Return the current step of the algorithm evolution.
    ///
    /// return: `usize`.
    fn generation(&self) -> usize;

    /// Return the number of function evaluations.
    ///
    /// return: `usize`.
    fn number_of_function_evaluations(&self) -> usize;

    /// Return the algorithm name.
    ///
    /// return: `String`.
    fn name(&self) -> String;

    /// Get the time when the algorithm started.
    ///
    /// return: `DateTime<Local>`.
    fn start_time(&self) -> DateTime<Local>;

    /// Return the stopping condition.
    ///
    /// return: `StoppingConditionType`.
    fn stopping_condition(&self) -> StoppingConditionType;

    /// Return the evolved population.
    ///
    /// return: `Population`.
    fn population(&self) -> Population;

    /// Whether the user asked the algorithm to stop.
    ///
    /// return: `bool`.
    fn is_interrupted(&self) -> bool {
        false
    }

    /// Get the elapsed hours, minutes and seconds since the start of the algorithm.
    ///
    /// return: `Elapsed`.
    fn elapsed(&self) -> Elapsed {
        let duration = Local::now() - self.start_time();
        Elapsed {
            hours: (duration.num_seconds() / 60) / 60,
            minutes: (duration.num_seconds() / 60) % 60,
            seconds: duration.num_seconds() % 60,
        }
    }

    /// Format the elapsed time as string.
    ///
    /// return: `String`.
    fn elapsed_as_string(&self) -> String {
        let e = self.elapsed();
        format!(
            "{:0>2} hours, {:0>2} minutes and {:0>2} seconds",
            e.hours, e.minutes, e.seconds
        )
    }

    /// Run the algorithm until the stopping condition is met or an interrupt is received. The
    /// interrupt is checked between generations; the last completed population is returned.
    ///
    /// return: `Result<RunResults, OError>`
    fn run(&mut self) -> Result<RunResults, OError> {
        info!("Starting {}", self.name());
        self.initialise()?;

        let mut interrupted = false;
        loop {
            let cond = self.stopping_condition();
            let elapsed = (Local::now() - self.start_time())
                .to_std()
                .unwrap_or_default();
            if cond.is_met(
                self.generation(),
                self.number_of_function_evaluations(),
                elapsed,
            ) {
                info!("Stopping evolution because the {} was reached", cond.name());
                break;
            }
            if self.is_interrupted() {
                warn!(
                    "Stopping evolution after generation #{} because of an interrupt",
                    self.generation().saturating_sub(1)
                );
                interrupted = true;
                break;
            }

            info!("Generation #{}", self.generation());
            self.evolve()?;
            info!(
                "Evolved generation #{} - Elapsed Time: {}",
                self.generation().saturating_sub(1),
                self.elapsed_as_string()
            );
        }
        info!("Took {}", self.elapsed_as_string());

        Ok(RunResults {
            population: self.population(),
            generation: self.generation(),
            evaluations: self.number_of_function_evaluations(),
            interrupted,
            started_at: self.start_time(),
            took: self.elapsed(),
        })
    }
}
