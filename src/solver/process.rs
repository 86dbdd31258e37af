use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::solver::{SolverError, SolverScript};

/// The output captured from a solver run that terminated on its own.
#[derive(Debug, Clone)]
pub struct SolverOutput {
    /// The text the solver wrote to the standard output.
    pub stdout: String,
    /// The text the solver wrote to the standard error.
    pub stderr: String,
    /// The exit code. This is `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

/// Runs the external solver executable with a command script on its standard input.
#[derive(Debug, Clone)]
pub struct SolverProcess {
    /// The solver executable.
    executable: PathBuf,
    /// The arguments passed to the executable.
    args: Vec<String>,
    /// The directory the solver runs in. When `None` the current directory is used.
    working_dir: Option<PathBuf>,
    /// How often the process status is checked while waiting for it.
    poll_interval: Duration,
}

impl SolverProcess {
    /// Create the runner for an executable.
    ///
    /// # Arguments
    ///
    /// * `executable`: The path to or the name of the solver executable.
    ///
    /// returns: `SolverProcess`
    pub fn new<P: AsRef<Path>>(executable: P) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
            args: Vec::new(),
            working_dir: None,
            poll_interval: Duration::from_millis(10),
        }
    }

    /// Pass command line arguments to the solver.
    ///
    /// # Arguments
    ///
    /// * `args`: The arguments.
    ///
    /// returns: `SolverProcess`
    pub fn with_args<I: IntoIterator<Item = S>, S: Into<String>>(mut self, args: I) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Run the solver in the given directory.
    ///
    /// # Arguments
    ///
    /// * `working_dir`: The directory.
    ///
    /// returns: `SolverProcess`
    pub fn with_working_dir<P: AsRef<Path>>(mut self, working_dir: P) -> Self {
        self.working_dir = Some(working_dir.as_ref().to_path_buf());
        self
    }

    /// The solver executable.
    ///
    /// returns: `&Path`
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Start the solver, send the rendered script to its standard input and wait for it to
    /// terminate. If the solver is still running after `timeout`, the process is killed and
    /// [`SolverError::Timeout`] is returned. A non-zero exit code is not an error: the solver
    /// outcome is judged from its result file.
    ///
    /// # Arguments
    ///
    /// * `script`: The commands to send.
    /// * `timeout`: The maximum time the solver may run for.
    ///
    /// returns: `Result<SolverOutput, SolverError>`
    pub fn execute(
        &self,
        script: &SolverScript,
        timeout: Duration,
    ) -> Result<SolverOutput, SolverError> {
        let mut command = Command::new(&self.executable);
        command.args(&self.args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SolverError::Spawn(self.executable.display().to_string(), e.to_string()))?;
        debug!("Started solver {:?} (pid {})", self.executable, child.id());

        // drain the pipes in the background so that the solver never blocks on a full pipe
        let stdout_reader = child.stdout.take().map(spawn_reader);
        let stderr_reader = child.stderr.take().map(spawn_reader);

        if let Some(mut stdin) = child.stdin.take() {
            // a solver may exit before reading all the commands
            if let Err(e) = stdin.write_all(script.render().as_bytes()) {
                if e.kind() != ErrorKind::BrokenPipe {
                    terminate(&mut child);
                    return Err(SolverError::Io(e.to_string()));
                }
            }
            // closing stdin sends EOF to the solver
        }

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    let now = Instant::now();
                    if now >= deadline {
                        terminate(&mut child);
                        // the reader threads are detached; they end once the pipes close
                        return Err(SolverError::Timeout(timeout));
                    }
                    thread::sleep(self.poll_interval.min(deadline - now));
                }
                Err(e) => {
                    terminate(&mut child);
                    return Err(SolverError::Io(e.to_string()));
                }
            }
        };

        let output = SolverOutput {
            stdout: join_reader(stdout_reader),
            stderr: join_reader(stderr_reader),
            exit_code: status.code(),
        };
        if !status.success() {
            debug!(
                "Solver {:?} exited with status {status}",
                self.executable
            );
        }
        Ok(output)
    }
}

/// Read a pipe to the end in a new thread.
fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        // partial output is still useful if the pipe breaks
        let _ = pipe.read_to_end(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    })
}

/// Collect the text read by a reader thread.
fn join_reader(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// Kill and reap a child process.
fn terminate(child: &mut Child) {
    if let Err(e) = child.kill() {
        // the process may have exited in the meantime
        if e.kind() != ErrorKind::InvalidInput {
            warn!("Cannot kill the solver process {}: {e}", child.id());
        }
    }
    if let Err(e) = child.wait() {
        warn!("Cannot reap the solver process {}: {e}", child.id());
    }
}
