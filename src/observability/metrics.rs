//! Metrics collection.
//!
//! # Metrics
//! - `router_transitions_total` (counter): phase changes by target phase
//! - `router_timer_firings_total` (counter): timer firings by outcome (live, stale)
//! - `router_no_match_total` (counter): locations nothing resolved
//! - `router_mounted_records` (gauge): records held by all levels at a depth

use crate::transition::phase::Phase;
use crate::transition::scheduler::TimerFiring;

pub fn record_transition(phase: Phase) {
    metrics::counter!("router_transitions_total", "phase" => phase.as_str()).increment(1);
}

pub fn record_timer_firing(outcome: TimerFiring) {
    metrics::counter!("router_timer_firings_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_no_match() {
    metrics::counter!("router_no_match_total").increment(1);
}

/// Sibling levels share a depth label, so the gauge moves by deltas.
pub fn record_records_mounted(depth: usize, count: usize) {
    metrics::gauge!("router_mounted_records", "depth" => depth.to_string()).increment(count as f64);
}

pub fn record_records_removed(depth: usize, count: usize) {
    metrics::gauge!("router_mounted_records", "depth" => depth.to_string()).decrement(count as f64);
}
