//! `cardkit-datefmt` — date display helpers for card UIs.

pub mod format;
pub mod input;
pub mod month;

pub use format::{
    format_date_mmddyyyy, format_date_month_ddyyyy, format_date_month_dyyyy,
    format_date_month_yyyy, format_datetime_mmddyyyy_hhmiam,
    format_datetime_month_ddyyyy_hhmiam, format_datetime_month_dyyyy_hmiam,
    format_epoch_seconds_to_la_mmddyyyy_hhmiam, to_api_date_format,
};
pub use input::DateInput;
pub use month::{add_months, to_month_end, to_month_start};
