// src/admission/mod.rs
//! Per-client admission control.
//!
//! Sliding-window limiter: every client owns a deque of request instants,
//! oldest first. A check trims expired instants off the front, rejects when
//! the remaining count has reached the limit, and otherwise records the new
//! request. Because the window slides with "now", a burst straddling a
//! boundary cannot double the effective rate the way fixed buckets allow.
//!
//! Known limitation: entries are trimmed per timestamp, never per client, so
//! the map grows with the number of distinct client ids seen by the process.

mod client_id;

pub use client_id::{UNKNOWN_CLIENT, client_id};

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, info};

/// Default maximum requests per client inside one window
pub const DEFAULT_MAX_REQUESTS: usize = 30;

/// Default lookback window (10 minutes)
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionConfig {
    pub max_requests: usize,
    pub window: Duration,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window: DEFAULT_WINDOW,
        }
    }
}

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    /// `retry_after` is the time until the oldest counted request expires
    Rejected { retry_after: Duration },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Sliding-window rate limiter keyed by client id.
///
/// Prune, decide and append run under one lock so concurrent requests from
/// the same client can never push its window past `max_requests`.
pub struct AdmissionController {
    config: AdmissionConfig,
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl AdmissionController {
    pub fn new(config: AdmissionConfig) -> Self {
        info!(
            max_requests = config.max_requests,
            window_secs = config.window.as_secs(),
            "Admission controller configured"
        );

        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Check (and on admission, record) a request from `client_id` now.
    pub fn check(&self, client_id: &str) -> Admission {
        self.check_at(client_id, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit clock reading.
    pub fn check_at(&self, client_id: &str, now: Instant) -> Admission {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let timestamps = windows.entry(client_id.to_string()).or_default();

        // Ordered oldest first, so expiry is a prefix trim
        while let Some(&oldest) = timestamps.front() {
            if now.saturating_duration_since(oldest) >= self.config.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }

        if timestamps.len() >= self.config.max_requests {
            let retry_after = timestamps
                .front()
                .map(|&oldest| {
                    self.config
                        .window
                        .saturating_sub(now.saturating_duration_since(oldest))
                })
                .unwrap_or(self.config.window);

            debug!(
                client = %client_id,
                counted = timestamps.len(),
                retry_after_ms = retry_after.as_millis() as u64,
                "Admission rejected"
            );
            return Admission::Rejected { retry_after };
        }

        timestamps.push_back(now);
        Admission::Admitted
    }

    /// Number of client ids with a window (including emptied ones)
    pub fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl Default for AdmissionController {
    fn default() -> Self {
        Self::new(AdmissionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn controller(max_requests: usize, window_secs: u64) -> AdmissionController {
        AdmissionController::new(AdmissionConfig {
            max_requests,
            window: Duration::from_secs(window_secs),
        })
    }

    #[test]
    fn test_admits_up_to_limit_then_rejects() {
        let limiter = AdmissionController::default();
        let start = Instant::now();

        for i in 0..DEFAULT_MAX_REQUESTS {
            let now = start + Duration::from_secs(i as u64);
            assert!(limiter.check_at("10.0.0.1", now).is_admitted(), "request {i}");
        }

        let now = start + Duration::from_secs(DEFAULT_MAX_REQUESTS as u64);
        assert!(!limiter.check_at("10.0.0.1", now).is_admitted());
    }

    #[test]
    fn test_rejection_reports_time_until_oldest_expires() {
        let limiter = controller(2, 600);
        let start = Instant::now();

        limiter.check_at("a", start);
        limiter.check_at("a", start + Duration::from_secs(100));

        let decision = limiter.check_at("a", start + Duration::from_secs(250));
        assert_eq!(
            decision,
            Admission::Rejected {
                retry_after: Duration::from_secs(350)
            }
        );
    }

    #[test]
    fn test_rejected_check_does_not_append() {
        let limiter = controller(1, 60);
        let start = Instant::now();

        assert!(limiter.check_at("a", start).is_admitted());
        // Hammering while limited must not extend the lockout
        for i in 1..10 {
            assert!(!limiter.check_at("a", start + Duration::from_secs(i)).is_admitted());
        }
        assert!(limiter.check_at("a", start + Duration::from_secs(60)).is_admitted());
    }

    #[test]
    fn test_window_slides_instead_of_resetting() {
        let limiter = controller(3, 600);
        let start = Instant::now();

        limiter.check_at("a", start);
        limiter.check_at("a", start + Duration::from_secs(300));
        limiter.check_at("a", start + Duration::from_secs(500));

        // Only the first request has aged out at t=600
        let t600 = start + Duration::from_secs(600);
        assert!(limiter.check_at("a", t600).is_admitted());
        assert!(!limiter.check_at("a", t600).is_admitted());

        // t=900 frees the second one
        assert!(limiter.check_at("a", start + Duration::from_secs(900)).is_admitted());
    }

    #[test]
    fn test_boundary_burst_cannot_double_rate() {
        let limiter = controller(5, 60);
        let start = Instant::now();

        // Burst at the end of one minute...
        for _ in 0..5 {
            assert!(limiter.check_at("a", start + Duration::from_secs(59)).is_admitted());
        }
        // ...is still counted just after the minute rolls over
        assert!(!limiter.check_at("a", start + Duration::from_secs(61)).is_admitted());
    }

    #[test]
    fn test_timestamp_expires_exactly_at_window() {
        let limiter = controller(1, 600);
        let start = Instant::now();

        assert!(limiter.check_at("a", start).is_admitted());
        assert!(!limiter.check_at("a", start + Duration::from_millis(599_999)).is_admitted());
        assert!(limiter.check_at("a", start + Duration::from_secs(600)).is_admitted());
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = controller(1, 600);
        let now = Instant::now();

        assert!(limiter.check_at("a", now).is_admitted());
        assert!(!limiter.check_at("a", now).is_admitted());
        assert!(limiter.check_at("b", now).is_admitted());
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn test_zero_limit_rejects_with_full_window() {
        let limiter = controller(0, 60);
        assert_eq!(
            limiter.check("a"),
            Admission::Rejected {
                retry_after: Duration::from_secs(60)
            }
        );
    }

    #[test]
    fn test_concurrent_checks_never_overshoot() {
        let limiter = Arc::new(controller(30, 600));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || {
                    (0..20).filter(|_| limiter.check("shared").is_admitted()).count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 30);
    }
}
