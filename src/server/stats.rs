//! Process-wide verification counters.
//!
//! Counters only ever increase and reset on restart. Each field is an
//! independent atomic; a snapshot taken under concurrent updates may mix
//! counts from neighbouring requests, which is acceptable for a stats endpoint.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{HallucinationRisk, VerificationResult};

#[derive(Debug)]
pub struct VerificationStats {
    total_verifications: AtomicU64,
    claims_checked: AtomicU64,
    claims_verified: AtomicU64,
    hallucinations_detected: AtomicU64,
    processing_micros: AtomicU64,
    started_at: DateTime<Utc>,
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total_verifications: u64,
    pub claims_checked: u64,
    pub claims_verified: u64,
    pub hallucinations_detected: u64,
    /// Mean processing time in seconds
    pub average_processing_time: f64,
    pub uptime_seconds: i64,
    pub timestamp: DateTime<Utc>,
}

impl Default for VerificationStats {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationStats {
    pub fn new() -> Self {
        Self {
            total_verifications: AtomicU64::new(0),
            claims_checked: AtomicU64::new(0),
            claims_verified: AtomicU64::new(0),
            hallucinations_detected: AtomicU64::new(0),
            processing_micros: AtomicU64::new(0),
            started_at: Utc::now(),
        }
    }

    /// Record one successful verification
    pub fn record(&self, result: &VerificationResult) {
        self.total_verifications.fetch_add(1, Ordering::Relaxed);
        self.claims_checked
            .fetch_add(result.claims.len() as u64, Ordering::Relaxed);
        self.claims_verified
            .fetch_add(result.verified_count() as u64, Ordering::Relaxed);
        if result.hallucination_risk == HallucinationRisk::High {
            self.hallucinations_detected.fetch_add(1, Ordering::Relaxed);
        }
        let micros = (result.processing_time_seconds * 1_000_000.0).round() as u64;
        self.processing_micros.fetch_add(micros, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let total = self.total_verifications.load(Ordering::Relaxed);
        let micros = self.processing_micros.load(Ordering::Relaxed);
        let average_processing_time = if total == 0 {
            0.0
        } else {
            micros as f64 / total as f64 / 1_000_000.0
        };
        let now = Utc::now();

        StatsSnapshot {
            total_verifications: total,
            claims_checked: self.claims_checked.load(Ordering::Relaxed),
            claims_verified: self.claims_verified.load(Ordering::Relaxed),
            hallucinations_detected: self.hallucinations_detected.load(Ordering::Relaxed),
            average_processing_time,
            uptime_seconds: (now - self.started_at).num_seconds(),
            timestamp: now,
        }
    }
}
