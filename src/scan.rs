//! Scan sequencer: a scan line sweeps the image left to right over
//! `duration_ms`, and each cat marker is detected when the line reaches its x
//! position. States: Idle -> Scanning -> Completed.
//!
//! The sequencer never sleeps itself. `start` registers one timer per marker
//! plus a finish timer on the shared `Timeline`; the owner feeds fired timers
//! back through `on_timer`.

use serde::Serialize;
use tracing::debug;

use crate::catalog::CatMarker;
use crate::clock::{TimerId, Timeline};
use crate::error::ScanInProgress;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScanPhase {
    #[default]
    Idle,
    Scanning,
    Completed,
}

/// Handed to the presentation layer when a channel is accepted.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub image_id: String,
    pub cat_markers: Vec<CatMarker>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionEvent {
    pub cat_index: usize,
    pub elapsed_ms: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub detected_count: u32,
    pub total_cats: u32,
    pub events: Vec<DetectionEvent>,
}

/// Timer payloads the sequencer registers on the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanTimer {
    Detect(usize),
    Finish,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScanSignal {
    CatDetected { cat_index: usize, marker: CatMarker, detected_count: u32, elapsed_ms: u64 },
    /// Every marker has been detected; the scan line may still be moving.
    AllCatsDetected { total: u32 },
    /// Image without cats, fired at the end of the sweep.
    NoCatsFound,
    Completed(ScanResult),
}

/// Offset of each marker's detection from scan start, in listed order.
pub fn detection_schedule(markers: &[CatMarker], duration_ms: u64) -> Vec<(usize, u64)> {
    markers
        .iter()
        .enumerate()
        .map(|(i, m)| (i, (duration_ms as f64 * m.x).round() as u64))
        .collect()
}

#[derive(Debug, Default)]
pub struct ScanSequencer {
    phase: ScanPhase,
    started_at_ms: u64,
    duration_ms: u64,
    markers: Vec<CatMarker>,
    detected: u32,
    events: Vec<DetectionEvent>,
    timers: Vec<TimerId>,
}

impl ScanSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn start<E: From<ScanTimer>>(
        &mut self,
        markers: &[CatMarker],
        duration_ms: u64,
        timeline: &mut Timeline<E>,
    ) -> Result<(), ScanInProgress> {
        if self.phase == ScanPhase::Scanning {
            return Err(ScanInProgress);
        }
        *self = Self {
            phase: ScanPhase::Scanning,
            started_at_ms: timeline.now_ms(),
            duration_ms,
            markers: markers.to_vec(),
            ..Self::default()
        };
        for (cat_index, offset) in detection_schedule(markers, duration_ms) {
            let id = timeline.after(offset, ScanTimer::Detect(cat_index).into());
            self.timers.push(id);
        }
        // Registered last so detections due exactly at the end still run first
        let finish = timeline.after(duration_ms, ScanTimer::Finish.into());
        self.timers.push(finish);
        debug!(cats = markers.len(), duration_ms, "scan started");
        Ok(())
    }

    pub fn on_timer(&mut self, timer: ScanTimer, now_ms: u64) -> Vec<ScanSignal> {
        if self.phase != ScanPhase::Scanning {
            return Vec::new();
        }
        let elapsed_ms = now_ms.saturating_sub(self.started_at_ms);
        let total = self.total_cats();
        let mut signals = Vec::new();
        match timer {
            ScanTimer::Detect(cat_index) => {
                let Some(&marker) = self.markers.get(cat_index) else {
                    return signals;
                };
                self.detected += 1;
                self.events.push(DetectionEvent { cat_index, elapsed_ms });
                signals.push(ScanSignal::CatDetected {
                    cat_index,
                    marker,
                    detected_count: self.detected,
                    elapsed_ms,
                });
                if self.detected == total {
                    signals.push(ScanSignal::AllCatsDetected { total });
                }
            }
            ScanTimer::Finish => {
                self.phase = ScanPhase::Completed;
                self.timers.clear();
                if total == 0 {
                    signals.push(ScanSignal::NoCatsFound);
                }
                debug!(detected = self.detected, total, elapsed_ms, "scan completed");
                signals.push(ScanSignal::Completed(self.result()));
            }
        }
        signals
    }

    /// Snapshot of what has been detected so far.
    pub fn result(&self) -> ScanResult {
        ScanResult {
            detected_count: self.detected,
            total_cats: self.total_cats(),
            events: self.events.clone(),
        }
    }

    pub fn detected_count(&self) -> u32 {
        self.detected
    }

    pub fn total_cats(&self) -> u32 {
        u32::try_from(self.markers.len()).unwrap_or(u32::MAX)
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Drop any pending timers of this scan and return to Idle.
    pub fn cancel<E>(&mut self, timeline: &mut Timeline<E>) {
        for id in self.timers.drain(..) {
            timeline.cancel(id);
        }
        *self = Self::default();
    }
}
