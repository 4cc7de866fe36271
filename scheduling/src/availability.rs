// scheduling/src/availability.rs

use chrono::NaiveDate;
use models::calendar::day_of_week;
use models::clinic::TimeSlot;
use storage::{ClinicStore, StoreResult};

/// Slots the doctor has defined for the date's weekday, minus those
/// already holding a non-cancelled appointment on that date. Ordered by
/// start time. An empty result is not an error here; the API layer
/// decides how to present it.
pub fn available_slots(
    store: &ClinicStore,
    doctor_id: u64,
    date: NaiveDate,
) -> StoreResult<Vec<TimeSlot>> {
    let day = day_of_week(date);
    let defined = store.time_slots_for_doctor_on_day(doctor_id, day)?;
    if defined.is_empty() {
        return Ok(Vec::new());
    }
    let booked = store.booked_slot_ids(doctor_id, date)?;
    Ok(defined
        .into_iter()
        .filter(|slot| !booked.contains(&slot.id))
        .collect())
}
