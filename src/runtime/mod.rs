/// Runtime orchestrator module - Gateway

mod orchestrator;
mod report;

pub use orchestrator::Orchestrator;
pub use report::{
    format_list, format_options, format_stats, list_report, options_report, ListReport,
    OptionsReport, ReportRunner,
};
