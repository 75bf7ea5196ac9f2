mod range;
mod reference_zone;

pub use range::TotalsRange;
pub use reference_zone::{
    format_iso, reference_midnight, reference_offset, reference_today, to_reference_date,
    to_reference_date_key, to_reference_day_range, to_reference_iso, to_reference_month_range,
    to_reference_year_range, DateValue, IsoRange, DATE_KEY_FORMAT, REFERENCE_OFFSET_MINUTES,
};
