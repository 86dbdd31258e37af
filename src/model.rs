//! The rotor geometry file imported by the solver. The file contains the rotor name, the tip
//! and hub radii, the number of sections and one line for each blade section with its radius,
//! chord and twist angle, written in fixed-width columns.
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::OError;

/// The geometry of a rotor blade.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RotorModel {
    /// The rotor name.
    name: String,
    /// The tip radius.
    tip_radius: f64,
    /// The hub radius.
    hub_radius: f64,
    /// The radial position of each section.
    radii: Vec<f64>,
    /// The chord length of each section.
    chords: Vec<f64>,
    /// The twist angle (in degrees) of each section.
    betas: Vec<f64>,
}

impl RotorModel {
    /// Create a new rotor model. This returns an error if the section vectors do not have the
    /// same length or are empty.
    ///
    /// # Arguments
    ///
    /// * `name`: The rotor name.
    /// * `tip_radius`: The tip radius.
    /// * `hub_radius`: The hub radius.
    /// * `radii`: The radial positions of the sections.
    /// * `chords`: The chord lengths at `radii`.
    /// * `betas`: The twist angles at `radii`.
    ///
    /// returns: `Result<RotorModel, OError>`
    pub fn new(
        name: &str,
        tip_radius: f64,
        hub_radius: f64,
        radii: Vec<f64>,
        chords: Vec<f64>,
        betas: Vec<f64>,
    ) -> Result<Self, OError> {
        if radii.len() != chords.len() || chords.len() != betas.len() {
            return Err(OError::Model(format!(
                "the radii ({}), chords ({}) and betas ({}) must have the same size",
                radii.len(),
                chords.len(),
                betas.len()
            )));
        }
        if radii.is_empty() {
            return Err(OError::Model(
                "the model must have at least one section".to_string(),
            ));
        }
        if name.trim().is_empty() || name.contains('\n') {
            return Err(OError::Model(format!("the rotor name '{name}' is not valid")));
        }

        Ok(Self {
            name: name.to_string(),
            tip_radius,
            hub_radius,
            radii,
            chords,
            betas,
        })
    }

    /// The rotor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tip radius.
    pub fn tip_radius(&self) -> f64 {
        self.tip_radius
    }

    /// The hub radius.
    pub fn hub_radius(&self) -> f64 {
        self.hub_radius
    }

    /// The number of blade sections.
    pub fn number_of_sections(&self) -> usize {
        self.radii.len()
    }

    /// The section radii.
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// The section chords.
    pub fn chords(&self) -> &[f64] {
        &self.chords
    }

    /// The section twist angles.
    pub fn betas(&self) -> &[f64] {
        &self.betas
    }

    /// Render the model file content. Values are written with three decimal places.
    ///
    /// returns: `String`
    pub fn to_model_string(&self) -> String {
        let mut output = format!("  {}\n", self.name);
        output.push_str(&format!(
            "  {:<15.3}    {:<15.3}    {:<15}\n",
            self.tip_radius,
            self.hub_radius,
            self.number_of_sections()
        ));
        for ((r, c), b) in self.radii.iter().zip(&self.chords).zip(&self.betas) {
            output.push_str(&format!("  {r:<15.3}    {c:<15.3}    {b:<15.3}\n"));
        }
        output
    }

    /// Write the model file.
    ///
    /// # Arguments
    ///
    /// * `file`: The file path.
    ///
    /// returns: `Result<(), OError>`
    pub fn write_file(&self, file: &Path) -> Result<(), OError> {
        fs::write(file, self.to_model_string()).map_err(|e| {
            OError::Model(format!(
                "cannot write the model file {}: {e}",
                file.display()
            ))
        })
    }

    /// Read a model from a file written with [`RotorModel::write_file`].
    ///
    /// # Arguments
    ///
    /// * `file`: The file path.
    ///
    /// returns: `Result<RotorModel, OError>`
    pub fn from_file(file: &Path) -> Result<Self, OError> {
        let text = fs::read_to_string(file).map_err(|e| {
            OError::Model(format!("cannot read the model file {}: {e}", file.display()))
        })?;
        Self::parse(&text)
    }

    /// Parse the content of a model file.
    fn parse(text: &str) -> Result<Self, OError> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let name = lines
            .next()
            .ok_or_else(|| OError::Model("the model file is empty".to_string()))?
            .trim();

        let header = lines
            .next()
            .ok_or_else(|| OError::Model("the radii line is missing".to_string()))?;
        let header = parse_values(header)?;
        if header.len() != 3 {
            return Err(OError::Model(format!(
                "the radii line must have 3 values, but {} were found",
                header.len()
            )));
        }
        let sections = header[2];
        if sections.fract() != 0.0 || sections < 0.0 {
            return Err(OError::Model(format!(
                "the number of sections {sections} is not valid"
            )));
        }

        let mut radii = Vec::new();
        let mut chords = Vec::new();
        let mut betas = Vec::new();
        for line in lines {
            let values = parse_values(line)?;
            if values.len() != 3 {
                return Err(OError::Model(format!(
                    "the section line '{}' must have 3 values",
                    line.trim()
                )));
            }
            radii.push(values[0]);
            chords.push(values[1]);
            betas.push(values[2]);
        }
        if radii.len() != sections as usize {
            return Err(OError::Model(format!(
                "the file declares {sections} sections but {} were found",
                radii.len()
            )));
        }

        Self::new(name, header[0], header[1], radii, chords, betas)
    }
}

/// Parse a line of whitespace-separated numbers.
fn parse_values(line: &str) -> Result<Vec<f64>, OError> {
    line.split_whitespace()
        .map(|v| {
            v.parse::<f64>()
                .map_err(|_| OError::Model(format!("cannot parse '{v}' as a number")))
        })
        .collect()
}

impl Display for RotorModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_model_string())
    }
}
