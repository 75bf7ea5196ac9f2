mod error;
pub mod fields;
mod operations;
mod requests;
mod types;

pub use error::CheckpostError;
pub use operations::{
    collect_date_keys, default_seized_items, missing_default_items, sum_daily_logs,
    summarize_totals, validate_new_checkpost, validate_seized_item,
};
pub use requests::{
    CaseRecord, DailyLogCounts, NewCase, NewCheckpost, NewDailyLog, NewSeizedItem, OTHERS_ITEM_ID,
};
pub use types::{Case, Checkpost, CheckpostTotals, DailyLog, SeizedItem, SeizedItemEntry, TotalsMap};
