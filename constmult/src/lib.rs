//! Multipliers by constants, built as shift-add graphs and pipelined for a target clock period.

mod error;
mod booth;
mod tree;
mod periodic;
mod timing;
mod schedule;
mod constmult;

pub use error::Error;
pub use booth::{recode, Recoding};
pub use tree::{build_tree, build_constant};
pub use periodic::{build_periodic, PeriodicConstant, Fraction};
pub use timing::{TimingModel, LinearTiming, PipelinedAdder};
pub use schedule::{schedule, schedule_into, Schedule, ScheduledOp, OperationSink};
pub use constmult::ConstMult;
