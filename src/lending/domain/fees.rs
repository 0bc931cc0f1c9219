use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use crate::utils::date::days_between;

// Tiered late-fee schedule: the first week overdue accrues at the standard
// rate, every day after that at the escalated rate, and the total is capped.
const STANDARD_DAILY_RATE: Decimal = dec!(0.50);
const ESCALATED_DAILY_RATE: Decimal = dec!(1.00);
const ESCALATION_AFTER_DAYS: i64 = 7;
pub(crate) const MAX_LATE_FEE: Decimal = dec!(15.00);

// Days past the loan period at calendar-day granularity; never negative.
pub(crate) fn overdue_days(borrowed_at: NaiveDateTime, now: NaiveDateTime,
                           loan_period_days: i64) -> i64 {
    (days_between(borrowed_at, now) - loan_period_days).max(0)
}

pub(crate) fn late_fee_for_days(overdue_days: i64) -> Decimal {
    if overdue_days <= 0 {
        return Decimal::ZERO;
    }
    let standard_days = overdue_days.min(ESCALATION_AFTER_DAYS);
    let escalated_days = (overdue_days - ESCALATION_AFTER_DAYS).max(0);
    let fee = Decimal::from(standard_days) * STANDARD_DAILY_RATE
        + Decimal::from(escalated_days) * ESCALATED_DAILY_RATE;
    fee.min(MAX_LATE_FEE).round_dp(2)
}
