// Gateway module for the staff directory core
// All external access must go through this gateway

mod aggregate;
mod filters;
mod loader;
mod paginate;
mod record;
mod view;

pub use aggregate::{chart_data, count_by, top_counts, ChartData, Count};
pub use filters::{apply_filters, cycle_choice, distinct_values, Choice, FilterSelection};
pub use loader::{
    load_dataset, parse_csv, source_from_config, FileSheetSource, HttpSheetSource, SheetSource,
};
pub use paginate::{clamp_page, page_window, paginate, total_pages, Page, PageLink, PageSize};
pub use record::{Dataset, Field, PhotoKind, Record};
pub use view::{BiodataView, InfografikView};

#[cfg(test)]
pub(crate) use loader::MockSheetSource;
