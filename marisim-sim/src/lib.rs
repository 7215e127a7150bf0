//! Simulation driver: scheduling, vessel movement, output sinks, and
//! trace recording, wired together by the engine.

pub mod engine;
pub mod movement;
pub mod outputs;
pub mod scheduler;
pub mod trace;

pub use engine::{SimulationEngine, SimulationStatistics};
pub use movement::MovementModel;
pub use outputs::{build_output, OutputHandler, OutputStatus};
pub use scheduler::{ReportKind, Scheduler};
pub use trace::{TraceAnalyzer, TraceEvent, TraceEventKind, TraceRecorder, TraceSummary};
