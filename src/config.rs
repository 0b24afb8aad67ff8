//! Solver parameter file handling.
//!
//! Parameters come from a plain `key = value` file, one per line:
//! vehicle count `m`, vehicle capacity `Q`, evaporation coefficient
//! `alpha`, distance-weighting exponent `beta`, initial pheromone level
//! `tau0` and the exploration/exploitation threshold `q0`. Every key is
//! required; an unknown key or a malformed value is a configuration error.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use serde::{Deserialize, Serialize};

/// Numeric parameters driving the colony model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverParams {
    /// Number of vehicles, and therefore ants per colony
    pub m: usize,
    /// Vehicle load capacity Q
    pub capacity: i64,
    /// Pheromone update coefficient alpha
    pub alpha: f64,
    /// Distance-weighting exponent beta
    pub beta: f64,
    /// Initial pheromone level tau0
    pub tau0: f64,
    /// Exploration/exploitation threshold q0
    pub q0: f64,
}

impl SolverParams {
    /// Parse parameters from a `key = value` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = File::open(&path)
            .map_err(|e| format!("Cannot open parameter file: {}", e))?;
        let reader = BufReader::new(file);

        let mut m: Option<usize> = None;
        let mut capacity: Option<i64> = None;
        let mut alpha: Option<f64> = None;
        let mut beta: Option<f64> = None;
        let mut tau0: Option<f64> = None;
        let mut q0: Option<f64> = None;

        for line in reader.lines() {
            let line = line.map_err(|e| format!("Read error: {}", e))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| format!("Malformed parameter line: {}", line))?;
            let key = key.trim();
            let value = value.trim();

            match key {
                "m" => {
                    m = Some(value.parse()
                        .map_err(|_| "Invalid vehicle count m")?);
                }
                "Q" => {
                    capacity = Some(value.parse()
                        .map_err(|_| "Invalid vehicle capacity Q")?);
                }
                "alpha" => {
                    alpha = Some(value.parse()
                        .map_err(|_| "Invalid pheromone coefficient alpha")?);
                }
                "beta" => {
                    beta = Some(value.parse()
                        .map_err(|_| "Invalid distance exponent beta")?);
                }
                "tau0" => {
                    tau0 = Some(value.parse()
                        .map_err(|_| "Invalid initial pheromone tau0")?);
                }
                "q0" => {
                    q0 = Some(value.parse()
                        .map_err(|_| "Invalid threshold q0")?);
                }
                other => {
                    return Err(format!("Unknown parameter: {}", other));
                }
            }
        }

        let params = SolverParams {
            m: m.ok_or("Missing parameter m")?,
            capacity: capacity.ok_or("Missing parameter Q")?,
            alpha: alpha.ok_or("Missing parameter alpha")?,
            beta: beta.ok_or("Missing parameter beta")?,
            tau0: tau0.ok_or("Missing parameter tau0")?,
            q0: q0.ok_or("Missing parameter q0")?,
        };
        params.validate()?;

        Ok(params)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.m == 0 {
            return Err("Vehicle count m must be positive".to_string());
        }
        if self.capacity <= 0 {
            return Err("Vehicle capacity Q must be positive".to_string());
        }
        if self.tau0 <= 0.0 {
            return Err("Initial pheromone tau0 must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            m: 2,
            capacity: 10,
            alpha: 0.1,
            beta: 2.0,
            tau0: 1.0,
            q0: 0.9,
        }
    }
}
