//! Per-entity, per-report due-time tracking.
//!
//! The scheduler keeps one entry per (MMSI, report kind) pair in a
//! `BTreeMap`, so entries due in the same tick always fire in ascending
//! (MMSI, kind) order and output is deterministic for a fixed scenario.
//! Firing reschedules `next_due = now + interval` rather than
//! `previous_due + interval`: after a stall each entry fires once to catch
//! up instead of replaying a backlog.

use std::collections::BTreeMap;

/// What kind of report an entry produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportKind {
    /// GGA fix sentence
    Gga,
    /// RMC recommended-minimum sentence
    Rmc,
    /// VTG course-and-speed sentence
    Vtg,
    /// AIS position report (Type 1 or 18 by class)
    AisPosition,
    /// AIS static and voyage report (Type 5)
    AisStaticVoyage,
    /// Base station report (Type 4)
    BaseStation,
    /// Aid-to-navigation report (Type 21)
    AidToNavigation,
}

impl ReportKind {
    /// True for the GPS text sentence kinds.
    pub fn is_gps(&self) -> bool {
        matches!(self, ReportKind::Gga | ReportKind::Rmc | ReportKind::Vtg)
    }

    /// Stable lowercase name, used in trace event details.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Gga => "gga",
            ReportKind::Rmc => "rmc",
            ReportKind::Vtg => "vtg",
            ReportKind::AisPosition => "ais_position",
            ReportKind::AisStaticVoyage => "ais_static_voyage",
            ReportKind::BaseStation => "base_station",
            ReportKind::AidToNavigation => "aid_to_navigation",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ScheduleEntry {
    next_due_ms: u64,
    interval_ms: u64,
}

/// Due-time tracker for the whole fleet.
///
/// Times are simulated milliseconds since simulation start. At most one
/// pending due-time exists per (MMSI, kind) pair.
#[derive(Debug, Default)]
pub struct Scheduler {
    entries: BTreeMap<(u32, ReportKind), ScheduleEntry>,
}

impl Scheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) an entry, first due at `now_ms`.
    pub fn schedule(&mut self, mmsi: u32, kind: ReportKind, interval_seconds: f64, now_ms: u64) {
        let interval_ms = (interval_seconds * 1000.0).round().max(1.0) as u64;
        self.entries.insert(
            (mmsi, kind),
            ScheduleEntry {
                next_due_ms: now_ms,
                interval_ms,
            },
        );
    }

    /// Removes every entry for an MMSI, e.g. when a vessel leaves the fleet.
    pub fn remove(&mut self, mmsi: u32) {
        self.entries.retain(|(key, _), _| *key != mmsi);
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries with their next due-times, in (MMSI, kind) order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, ReportKind, u64)> + '_ {
        self.entries
            .iter()
            .map(|((mmsi, kind), entry)| (*mmsi, *kind, entry.next_due_ms))
    }

    /// Next due-time for a (MMSI, kind) pair, if registered.
    pub fn next_due(&self, mmsi: u32, kind: ReportKind) -> Option<u64> {
        self.entries.get(&(mmsi, kind)).map(|e| e.next_due_ms)
    }

    /// Fires every entry due at `now_ms`, in ascending (MMSI, kind) order.
    ///
    /// Each fired entry is rescheduled to `now_ms + interval`, so a pair
    /// fires at most once per call and its next due-time strictly exceeds
    /// the firing time.
    pub fn due(&mut self, now_ms: u64) -> Vec<(u32, ReportKind)> {
        let mut fired = Vec::new();
        for (key, entry) in self.entries.iter_mut() {
            if entry.next_due_ms <= now_ms {
                fired.push(*key);
                entry.next_due_ms = now_ms + entry.interval_ms;
            }
        }
        fired
    }
}
