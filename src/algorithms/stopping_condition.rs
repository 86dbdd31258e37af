use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Trait to define a condition that causes an algorithm to terminate.
pub trait StoppingCondition<T: PartialOrd> {
    /// The target value of the stopping condition.
    fn target(&self) -> T;

    /// Whether the stopping condition is met.
    fn is_met(&self, current: T) -> bool {
        self.target() <= current
    }

    /// A name describing the stopping condition.
    fn name() -> String;
}

/// Number of generations after which a genetic algorithm terminates. The initial population
/// counts as the first generation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MaxGenerationValue(pub usize);

impl StoppingCondition<usize> for MaxGenerationValue {
    fn target(&self) -> usize {
        self.0
    }

    fn name() -> String {
        "maximum number of generations".to_string()
    }
}

/// Number of function evaluations after which a genetic algorithm terminates.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MaxFunctionEvaluationValue(pub usize);

impl StoppingCondition<usize> for MaxFunctionEvaluationValue {
    fn target(&self) -> usize {
        self.0
    }

    fn name() -> String {
        "maximum number of function evaluations".to_string()
    }
}

/// Elapsed time after which a genetic algorithm terminates.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MaxDurationValue(pub Duration);

impl StoppingCondition<Duration> for MaxDurationValue {
    fn target(&self) -> Duration {
        self.0
    }

    fn name() -> String {
        "maximum duration".to_string()
    }
}

/// The type of stopping condition. Pick one type to inform the algorithm how/when it should
/// terminate the population evolution.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum StoppingConditionType {
    /// Set a maximum duration
    MaxDuration(MaxDurationValue),
    /// Set a maximum number of generations
    MaxGeneration(MaxGenerationValue),
    /// Set a maximum number of function evaluations
    MaxFunctionEvaluations(MaxFunctionEvaluationValue),
    /// Stop when at least on condition is met
    Any(Vec<StoppingConditionType>),
    /// Stop when all on conditions are met
    All(Vec<StoppingConditionType>),
}

impl StoppingConditionType {
    /// A name describing the stopping condition.
    ///
    /// returns: `String`
    pub fn name(&self) -> String {
        match self {
            StoppingConditionType::MaxDuration(_) => MaxDurationValue::name(),
            StoppingConditionType::MaxGeneration(_) => MaxGenerationValue::name(),
            StoppingConditionType::MaxFunctionEvaluations(_) => MaxFunctionEvaluationValue::name(),
            StoppingConditionType::Any(s) => s
                .iter()
                .map(|cond| cond.name())
                .collect::<Vec<String>>()
                .join(" OR "),
            StoppingConditionType::All(s) => s
                .iter()
                .map(|cond| cond.name())
                .collect::<Vec<String>>()
                .join(" AND "),
        }
    }

    /// Whether the condition is met.
    ///
    /// # Arguments
    ///
    /// * `generation`: The number of completed generations.
    /// * `evaluations`: The number of function evaluations.
    /// * `elapsed`: The time since the algorithm started.
    ///
    /// returns: `bool`
    pub fn is_met(&self, generation: usize, evaluations: usize, elapsed: Duration) -> bool {
        match self {
            StoppingConditionType::MaxDuration(t) => t.is_met(elapsed),
            StoppingConditionType::MaxGeneration(t) => t.is_met(generation),
            StoppingConditionType::MaxFunctionEvaluations(t) => t.is_met(evaluations),
            StoppingConditionType::Any(s) => s
                .iter()
                .any(|c| c.is_met(generation, evaluations, elapsed)),
            StoppingConditionType::All(s) => s
                .iter()
                .all(|c| c.is_met(generation, evaluations, elapsed)),
        }
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use crate::algorithms::{
        MaxDurationValue, MaxFunctionEvaluationValue, MaxGenerationValue, StoppingConditionType,
    };

    #[test]
    fn test_is_met() {
        let c = StoppingConditionType::MaxGeneration(MaxGenerationValue(300));
        assert!(!c.is_met(299, 0, Duration::ZERO));
        assert!(c.is_met(300, 0, Duration::ZERO));

        let c = StoppingConditionType::Any(vec![
            StoppingConditionType::MaxFunctionEvaluations(MaxFunctionEvaluationValue(1000)),
            StoppingConditionType::MaxDuration(MaxDurationValue(Duration::from_secs(60))),
        ]);
        assert!(!c.is_met(1, 999, Duration::from_secs(59)));
        assert!(c.is_met(1, 1000, Duration::from_secs(1)));
        assert!(c.is_met(1, 10, Duration::from_secs(61)));
        assert_eq!(
            c.name(),
            "maximum number of function evaluations OR maximum duration"
        );

        let c = StoppingConditionType::All(vec![
            StoppingConditionType::MaxGeneration(MaxGenerationValue(10)),
            StoppingConditionType::MaxFunctionEvaluations(MaxFunctionEvaluationValue(100)),
        ]);
        assert!(!c.is_met(10, 99, Duration::ZERO));
        assert!(c.is_met(10, 100, Duration::ZERO));
    }
}
