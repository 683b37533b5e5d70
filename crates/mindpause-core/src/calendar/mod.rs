mod jalali;

pub use jalali::{days_in_month, is_leap_year, month_name, JalaliDate};
