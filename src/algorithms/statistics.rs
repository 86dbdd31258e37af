use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::core::{Individual, Individuals, OError};
use crate::utils::{vector_max, vector_mean, vector_min, vector_std};

/// The statistics of the objective values of a population, calculated for each objective.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GenerationStatistics {
    /// The generation number.
    pub generation: usize,
    /// The number of individuals evaluated in this generation.
    pub evaluations: usize,
    /// The mean.
    pub mean: Vec<f64>,
    /// The population standard deviation.
    pub std: Vec<f64>,
    /// The minimum value.
    pub min: Vec<f64>,
    /// The maximum value.
    pub max: Vec<f64>,
}

impl GenerationStatistics {
    /// Calculate the statistics of evaluated individuals. This returns an error if the vector is
    /// empty or an individual has not been evaluated.
    ///
    /// # Arguments
    ///
    /// * `generation`: The generation number.
    /// * `evaluations`: The number of individuals evaluated in the generation.
    /// * `individuals`: The individuals.
    ///
    /// returns: `Result<GenerationStatistics, OError>`
    pub fn new(
        generation: usize,
        evaluations: usize,
        individuals: &[Individual],
    ) -> Result<Self, OError> {
        let objectives = individuals.objective_vectors()?;
        let number_of_objectives = objectives.first().map_or(0, |o| o.len());
        let mut stats = Self {
            generation,
            evaluations,
            mean: Vec::with_capacity(number_of_objectives),
            std: Vec::with_capacity(number_of_objectives),
            min: Vec::with_capacity(number_of_objectives),
            max: Vec::with_capacity(number_of_objectives),
        };
        if number_of_objectives == 0 {
            return Err(OError::Generic(
                "Cannot calculate the statistics of an empty population".to_string(),
            ));
        }

        for j in 0..number_of_objectives {
            let values: Vec<f64> = objectives.iter().map(|o| o[j]).collect();
            stats.mean.push(vector_mean(&values)?);
            stats.std.push(vector_std(&values)?);
            stats.min.push(vector_min(&values)?);
            stats.max.push(vector_max(&values)?);
        }
        Ok(stats)
    }

    /// The tab-separated header of the statistics table.
    ///
    /// returns: `&'static str`
    pub fn header() -> &'static str {
        "gen\tevals\tstd\tmin\tavg\tmax"
    }

    /// The statistics as a tab-separated row.
    ///
    /// returns: `String`
    pub fn to_row(&self) -> String {
        format!(
            "{}\t{}\t{:?}\t{:?}\t{:?}\t{:?}",
            self.generation, self.evaluations, self.std, self.min, self.mean, self.max
        )
    }
}

/// The record of the statistics of all the generations. Each new record is logged and, when a
/// file is given, appended to the file.
#[derive(Debug)]
pub struct Logbook {
    /// The statistics of each generation.
    records: Vec<GenerationStatistics>,
    /// The file the records are written to.
    file: Option<PathBuf>,
}

impl Logbook {
    /// Create a new logbook. When a file is given, the file is created (or truncated) and the
    /// table header is written to it.
    ///
    /// # Arguments
    ///
    /// * `file`: The optional path to the file the statistics are streamed to.
    ///
    /// returns: `Result<Logbook, OError>`
    pub fn new(file: Option<&Path>) -> Result<Self, OError> {
        if let Some(file) = file {
            let mut f = File::create(file).map_err(|e| Self::file_error(file, e))?;
            writeln!(f, "{}", GenerationStatistics::header())
                .map_err(|e| Self::file_error(file, e))?;
        }
        Ok(Self {
            records: Vec::new(),
            file: file.map(Path::to_path_buf),
        })
    }

    /// Add the statistics of a generation.
    ///
    /// # Arguments
    ///
    /// * `stats`: The statistics.
    ///
    /// returns: `Result<(), OError>`
    pub fn record(&mut self, stats: GenerationStatistics) -> Result<(), OError> {
        info!(
            "Generation #{} - evaluations: {} - min: {:?} - avg: {:?} - max: {:?} - std: {:?}",
            stats.generation, stats.evaluations, stats.min, stats.mean, stats.max, stats.std
        );
        if let Some(file) = &self.file {
            let mut f = OpenOptions::new()
                .append(true)
                .open(file)
                .map_err(|e| Self::file_error(file, e))?;
            writeln!(f, "{}", stats.to_row()).map_err(|e| Self::file_error(file, e))?;
        }
        self.records.push(stats);
        Ok(())
    }

    /// The recorded statistics.
    ///
    /// returns: `&[GenerationStatistics]`
    pub fn records(&self) -> &[GenerationStatistics] {
        &self.records
    }

    /// The statistics of the last generation.
    ///
    /// returns: `Option<&GenerationStatistics>`
    pub fn last(&self) -> Option<&GenerationStatistics> {
        self.records.last()
    }

    /// The statistics table with its header.
    ///
    /// returns: `String`
    pub fn stream(&self) -> String {
        let mut table = GenerationStatistics::header().to_string();
        for r in &self.records {
            table.push('\n');
            table.push_str(&r.to_row());
        }
        table
    }

    fn file_error(file: &Path, e: std::io::Error) -> OError {
        OError::AlgorithmExport(format!(
            "cannot write the statistics to {}: {e}",
            file.display()
        ))
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use crate::algorithms::{GenerationStatistics, Logbook};
    use crate::core::test_utils::{assert_approx_array_eq, individuals_from_obj_values};
    use crate::core::Individual;

    #[test]
    fn test_statistics() {
        let individuals =
            individuals_from_obj_values(&[vec![1.0, -2.0], vec![3.0, -4.0], vec![5.0, -6.0]]);
        let stats = GenerationStatistics::new(4, 2, &individuals).unwrap();
        assert_eq!(stats.generation, 4);
        assert_eq!(stats.evaluations, 2);
        assert_approx_array_eq(&stats.mean, &[3.0, -4.0], None);
        assert_approx_array_eq(&stats.std, &[1.6329932, 1.6329932], None);
        assert_approx_array_eq(&stats.min, &[1.0, -6.0], None);
        assert_approx_array_eq(&stats.max, &[5.0, -2.0], None);

        assert!(GenerationStatistics::new(0, 0, &[]).is_err());
        assert!(GenerationStatistics::new(0, 0, &[Individual::new(vec![0.0])]).is_err());
    }

    #[test]
    /// The records are appended to the file after the header.
    fn test_logbook_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("stats.log");
        let mut logbook = Logbook::new(Some(&file)).unwrap();

        for generation in 0..3 {
            let individuals = individuals_from_obj_values(&[vec![generation as f64]]);
            logbook
                .record(GenerationStatistics::new(generation, 1, &individuals).unwrap())
                .unwrap();
        }
        assert_eq!(logbook.records().len(), 3);
        assert_eq!(logbook.last().unwrap().generation, 2);

        let content = fs::read_to_string(&file).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "gen\tevals\tstd\tmin\tavg\tmax");
        assert_eq!(lines[3], "2\t1\t[0.0]\t[2.0]\t[2.0]\t[2.0]");
        assert_eq!(logbook.stream(), lines.join("\n"));
    }
}
