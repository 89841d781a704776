//! Scheduling for recurring transactions.

use time::{Date, Duration, Month, OffsetDateTime};

use crate::transaction::core::{RecurrenceType, Transaction};

/// The most occurrences [due_occurrences] will produce for one transaction.
pub const MAX_DUE_OCCURRENCES: usize = 1000;

/// The date a transaction with the given recurrence repeats on next.
///
/// Monthly and yearly recurrences keep the day of the month, clamped to the
/// last day of shorter months, e.g. 31 January repeats on 28 or 29 February.
/// Returns `None` for [RecurrenceType::None] or if the date would overflow.
pub fn next_occurrence(date: OffsetDateTime, recurrence: RecurrenceType) -> Option<OffsetDateTime> {
    nth_occurrence(date, recurrence, 1)
}

/// The copies of a recurring transaction that have fallen due by `now`.
///
/// Each copy is a one-off transaction without an ID, dated at one of the
/// scheduled occurrences after the original date and no later than `now`.
/// Occurrences are computed from the original date, so a monthly transaction
/// on the 31st returns to the 31st after passing through shorter months.
pub fn due_occurrences(transaction: &Transaction, now: OffsetDateTime) -> Vec<Transaction> {
    if !transaction.is_recurring {
        return Vec::new();
    }

    let mut occurrences = Vec::new();

    // One past the cap, to tell a full schedule from a truncated one.
    for n in 1..=MAX_DUE_OCCURRENCES as u32 + 1 {
        let Some(date) = nth_occurrence(transaction.date, transaction.recurrence_type, n) else {
            break;
        };

        if date > now {
            break;
        }

        if occurrences.len() == MAX_DUE_OCCURRENCES {
            tracing::warn!(
                "Transaction {:?} has more than {MAX_DUE_OCCURRENCES} due occurrences, \
                 only the first {MAX_DUE_OCCURRENCES} were created",
                transaction.id
            );
            break;
        }

        let mut occurrence = transaction.clone();
        occurrence.id.clear();
        occurrence.date = date;
        occurrence.is_recurring = false;
        occurrence.recurrence_type = RecurrenceType::None;
        occurrences.push(occurrence);
    }

    occurrences
}

fn nth_occurrence(
    date: OffsetDateTime,
    recurrence: RecurrenceType,
    n: u32,
) -> Option<OffsetDateTime> {
    match recurrence {
        RecurrenceType::None => None,
        RecurrenceType::Daily => date.checked_add(Duration::days(n as i64)),
        RecurrenceType::Weekly => date.checked_add(Duration::weeks(n as i64)),
        RecurrenceType::Monthly => add_months(date, n),
        RecurrenceType::Yearly => add_months(date, n.checked_mul(12)?),
    }
}

fn add_months(date: OffsetDateTime, months: u32) -> Option<OffsetDateTime> {
    let zero_based_month = date.month() as i64 - 1 + months as i64;
    let year = date.year() as i64 + zero_based_month.div_euclid(12);
    let year = i32::try_from(year).ok()?;
    let month = Month::try_from((zero_based_month.rem_euclid(12) + 1) as u8).ok()?;
    let day = date.day().min(time::util::days_in_month(month, year));

    let new_date = Date::from_calendar_date(year, month, day).ok()?;

    Some(date.replace_date(new_date))
}
