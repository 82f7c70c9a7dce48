mod combination;
mod results;
mod value;

pub use combination::ParameterCombination;
pub use results::{
    Cell, ERROR_DETAIL_COLUMN, ResultsTable, RunPhase, RunResult, RunStatus,
    SOLVE_SECONDS_COLUMN, STATUS_COLUMN, SweepSummary, TabularData,
};
pub use value::{ParamValue, Target};
