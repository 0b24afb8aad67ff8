//! Shared pheromone state of one colony.
//!
//! The intensity matrix is shared between the construction path and the
//! evaporation daemon, so it lives behind a mutex; every read-modify-write
//! holds the lock for a full sweep. The companion edge matrix records
//! which edges have been traversed by at least one constructed route and
//! is only ever touched by the construction path.
//!
//! Note the evaporation step reproduces the reference behavior exactly:
//! it adds a fixed delta to every off-diagonal entry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Pheromone intensities, shared with the evaporation daemon
pub type SharedMatrix = Arc<Mutex<Vec<Vec<f64>>>>;

/// Symmetric pheromone intensities plus the traversed-edge flags.
pub struct PheromoneField {
    tau: SharedMatrix,
    traversed: Vec<Vec<bool>>,
    tau0: f64,
    n: usize,
}

impl PheromoneField {
    /// Initialize every off-diagonal intensity to `tau0`
    pub fn new(n: usize, tau0: f64) -> Self {
        let mut tau = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    tau[i][j] = tau0;
                }
            }
        }

        PheromoneField {
            tau: Arc::new(Mutex::new(tau)),
            traversed: vec![vec![false; n]; n],
            tau0,
            n,
        }
    }

    /// Handle for the evaporation daemon
    pub fn tau_handle(&self) -> SharedMatrix {
        Arc::clone(&self.tau)
    }

    fn lock_tau(&self) -> MutexGuard<'_, Vec<Vec<f64>>> {
        self.tau.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run a closure against the current intensities under the lock
    pub fn with_tau<R>(&self, f: impl FnOnce(&[Vec<f64>]) -> R) -> R {
        let tau = self.lock_tau();
        f(&tau)
    }

    /// Current intensity of one edge
    pub fn tau_at(&self, i: usize, j: usize) -> f64 {
        self.lock_tau()[i][j]
    }

    /// Whether an edge has been flagged as traversed
    pub fn traversed(&self, i: usize, j: usize) -> bool {
        self.traversed[i][j]
    }

    /// Flag every edge of a completed route as traversed, symmetrically
    pub fn mark_route(&mut self, route: &[usize]) {
        for pair in route.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a != b {
                self.traversed[a][b] = true;
                self.traversed[b][a] = true;
            }
        }
    }

    /// Local update: move every traversed edge toward `tau0`
    pub fn local_update(&self, alpha: f64) {
        let mut tau = self.lock_tau();
        for i in 0..self.n {
            for j in 0..self.n {
                if i != j && self.traversed[i][j] {
                    tau[i][j] = (1.0 - alpha) * tau[i][j] + alpha * self.tau0;
                }
            }
        }
    }

    /// Global update: reinforce the best route's edges inversely to its length
    pub fn global_update(&self, route: &[usize], distance: i64, alpha: f64) {
        if distance <= 0 {
            return;
        }
        let deposit = alpha * (1.0 / distance as f64);

        let mut tau = self.lock_tau();
        for pair in route.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a != b {
                let updated = (1.0 - alpha) * tau[a][b] + deposit;
                tau[a][b] = updated;
                tau[b][a] = updated;
            }
        }
    }

    /// Check the `tau[i][j] == tau[j][i]` invariant
    pub fn is_symmetric(&self) -> bool {
        let tau = self.lock_tau();
        for i in 0..self.n {
            for j in i + 1..self.n {
                if (tau[i][j] - tau[j][i]).abs() > 1e-12 {
                    return false;
                }
            }
        }
        true
    }
}

/// One evaporation sweep: add `delta` to every off-diagonal entry
pub fn evaporate_sweep(tau: &mut [Vec<f64>], delta: f64) {
    let n = tau.len();
    for i in 0..n {
        for j in 0..n {
            if i != j {
                tau[i][j] += delta;
            }
        }
    }
}

/// Background task sweeping the intensity matrix for the lifetime of one
/// construction pass sequence. Stopped (and joined) when dropped.
pub struct EvaporationDaemon {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl EvaporationDaemon {
    /// Spawn the daemon against a shared intensity matrix
    pub fn start(tau: SharedMatrix, delta: f64) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                {
                    let mut matrix = tau.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                    evaporate_sweep(&mut matrix, delta);
                }
                thread::sleep(Duration::from_millis(1));
            }
        });

        EvaporationDaemon {
            stop,
            handle: Some(handle),
        }
    }

    /// Signal the daemon and wait for it to exit
    pub fn stop(self) {}
}

impl Drop for EvaporationDaemon {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_field() {
        let field = PheromoneField::new(3, 1.5);
        assert_eq!(field.tau_at(0, 0), 0.0);
        assert_eq!(field.tau_at(0, 1), 1.5);
        assert!(field.is_symmetric());
        assert!(!field.traversed(0, 1));
    }

    #[test]
    fn test_local_update_fixed_point_at_tau0() {
        // alpha = 0.1, tau0 = 1.0: an untouched edge stays at tau0
        let mut field = PheromoneField::new(3, 1.0);
        field.mark_route(&[0, 1, 2, 0]);
        field.local_update(0.1);
        assert!((field.tau_at(0, 1) - 1.0).abs() < 1e-12);
        assert!(field.is_symmetric());
    }

    #[test]
    fn test_local_update_moves_toward_tau0() {
        let mut field = PheromoneField::new(2, 1.0);
        field.mark_route(&[0, 1, 0]);

        // Raise the edge above tau0, then watch it contract
        field.tau_handle().lock().unwrap()[0][1] = 3.0;
        field.tau_handle().lock().unwrap()[1][0] = 3.0;

        field.local_update(0.1);
        let after_one = field.tau_at(0, 1);
        assert!((after_one - (0.9 * 3.0 + 0.1)).abs() < 1e-12);

        field.local_update(0.1);
        let after_two = field.tau_at(0, 1);
        assert!(after_two < after_one);
        assert!(after_two > 1.0);
    }

    #[test]
    fn test_local_update_skips_untraversed_edges() {
        let mut field = PheromoneField::new(3, 1.0);
        field.mark_route(&[0, 1, 0]);
        field.tau_handle().lock().unwrap()[1][2] = 5.0;
        field.tau_handle().lock().unwrap()[2][1] = 5.0;

        field.local_update(0.5);
        assert_eq!(field.tau_at(1, 2), 5.0);
    }

    #[test]
    fn test_global_update_reinforces_route_edges() {
        // Best route of distance 50: deposit is alpha * 0.02
        let field = PheromoneField::new(3, 1.0);
        field.global_update(&[0, 1, 2, 0], 50, 0.1);

        let expected = 0.9 * 1.0 + 0.1 * 0.02;
        assert!((field.tau_at(0, 1) - expected).abs() < 1e-12);
        assert!((field.tau_at(1, 2) - expected).abs() < 1e-12);
        assert!((field.tau_at(2, 0) - expected).abs() < 1e-12);
        assert!(field.is_symmetric());
    }

    #[test]
    fn test_global_update_ignores_degenerate_route() {
        let field = PheromoneField::new(2, 1.0);
        field.global_update(&[0, 0], 0, 0.1);
        assert_eq!(field.tau_at(0, 1), 1.0);
    }

    #[test]
    fn test_evaporate_sweep_adds_delta_off_diagonal() {
        let mut tau = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        evaporate_sweep(&mut tau, 0.2);
        assert!((tau[0][1] - 1.2).abs() < 1e-12);
        assert!((tau[1][0] - 1.2).abs() < 1e-12);
        assert_eq!(tau[0][0], 0.0);
    }

    #[test]
    fn test_daemon_raises_intensities_then_stops() {
        let field = PheromoneField::new(3, 1.0);
        let daemon = EvaporationDaemon::start(field.tau_handle(), 0.2);
        thread::sleep(Duration::from_millis(20));
        daemon.stop();

        let after_stop = field.tau_at(0, 1);
        assert!(after_stop > 1.0);
        assert!(field.is_symmetric());

        // Joined daemon leaves the matrix alone
        thread::sleep(Duration::from_millis(10));
        assert_eq!(field.tau_at(0, 1), after_stop);
    }
}
