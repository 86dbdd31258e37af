use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// One step of the solver command protocol. Each step renders to the exact keyword sequence the
/// solver expects on its standard input, including the empty lines used to leave sub-menus.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverCommand {
    /// Disable the graphical output. This is always the first step of a script.
    DisableGraphics,
    /// Load the aerodynamic (polar) data of the blade sections.
    LoadPolar(PathBuf),
    /// Import the rotor geometry from a model file.
    LoadModel {
        /// The rotor model file.
        path: PathBuf,
        /// The number of blades.
        blade_count: usize,
        /// The flight speed in m/s.
        flight_speed: f64,
    },
    /// Set the fluid density.
    SetDensity(f64),
    /// Set the number of radial stations used in the analysis.
    SetRadialStations(usize),
    /// Run the analysis at one operating point.
    RunOperatingPoint {
        /// The inflow velocity in m/s.
        velocity: f64,
        /// The rotational speed in rpm.
        rpm: f64,
    },
    /// Write the results of all the operating points analysed so far to a file.
    DumpResults(PathBuf),
    /// Close the solver.
    Quit,
}

impl SolverCommand {
    /// Render the command as the text sent to the solver.
    ///
    /// returns: `String`
    pub fn render(&self) -> String {
        match self {
            SolverCommand::DisableGraphics => "plop\ng\n\n".to_string(),
            SolverCommand::LoadPolar(path) => format!("aero\nread\n{}\n\n", path.display()),
            SolverCommand::LoadModel {
                path,
                blade_count,
                flight_speed,
            } => format!("impo\n{}\n{blade_count}\n{flight_speed}\n", path.display()),
            SolverCommand::SetDensity(density) => format!("dens\n{density}\n"),
            SolverCommand::SetRadialStations(n) => format!("oper\nn\n{n}\n\n"),
            SolverCommand::RunOperatingPoint { velocity, rpm } => {
                format!("oper\nvelo {velocity}\nrpm {rpm}\naddc\nvseq\n\n\n\n\n")
            }
            SolverCommand::DumpResults(path) => format!("oper\ncput\n{}\n\n", path.display()),
            SolverCommand::Quit => "quit\n".to_string(),
        }
    }
}

/// An ordered sequence of solver commands. A new script always starts by disabling the
/// graphical output; [`SolverScript::render`] appends the final quit command.
///
/// # Example
/// ```
/// use optirotor::solver::SolverScript;
///
/// let mut script = SolverScript::new();
/// script
///     .load_polar("AG14_Re50000.txt")
///     .load_model("rotor_g0_i1", 2, 0.01)
///     .run_operating_point(0.01, 6500.0)
///     .run_operating_point(0.01, 9500.0)
///     .dump_results("res_g0_i1");
/// assert!(script.render().ends_with("quit\n"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SolverScript {
    commands: Vec<SolverCommand>,
}

impl Default for SolverScript {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverScript {
    /// Create a new script with graphics disabled.
    ///
    /// returns: `SolverScript`
    pub fn new() -> Self {
        Self {
            commands: vec![SolverCommand::DisableGraphics],
        }
    }

    /// Append a command.
    ///
    /// # Arguments
    ///
    /// * `command`: The command to append.
    ///
    /// returns: `&mut Self`
    pub fn push(&mut self, command: SolverCommand) -> &mut Self {
        self.commands.push(command);
        self
    }

    /// Append the command loading the section polar.
    pub fn load_polar<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
        self.push(SolverCommand::LoadPolar(path.as_ref().to_path_buf()))
    }

    /// Append the command importing the rotor model.
    pub fn load_model<P: AsRef<Path>>(
        &mut self,
        path: P,
        blade_count: usize,
        flight_speed: f64,
    ) -> &mut Self {
        self.push(SolverCommand::LoadModel {
            path: path.as_ref().to_path_buf(),
            blade_count,
            flight_speed,
        })
    }

    /// Append the command setting the fluid density.
    pub fn set_density(&mut self, density: f64) -> &mut Self {
        self.push(SolverCommand::SetDensity(density))
    }

    /// Append the command setting the number of radial stations.
    pub fn set_radial_stations(&mut self, n: usize) -> &mut Self {
        self.push(SolverCommand::SetRadialStations(n))
    }

    /// Append the command running one operating point.
    pub fn run_operating_point(&mut self, velocity: f64, rpm: f64) -> &mut Self {
        self.push(SolverCommand::RunOperatingPoint { velocity, rpm })
    }

    /// Append the command writing the results to `path`.
    pub fn dump_results<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
        self.push(SolverCommand::DumpResults(path.as_ref().to_path_buf()))
    }

    /// The commands added so far, without the final quit command.
    ///
    /// returns: `&[SolverCommand]`
    pub fn commands(&self) -> &[SolverCommand] {
        &self.commands
    }

    /// Render the full script, terminated by the quit command.
    ///
    /// returns: `String`
    pub fn render(&self) -> String {
        let mut script: String = self.commands.iter().map(|c| c.render()).collect();
        script.push_str(&SolverCommand::Quit.render());
        script
    }
}

impl Display for SolverScript {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}
