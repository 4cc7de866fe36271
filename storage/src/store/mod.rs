// storage/src/store/mod.rs
//
// One sled tree per entity, values encoded with serde_json, ids from
// sled's monotonic id generator. Uniqueness constraints (login identities,
// the booking invariants, one-feedback-per-appointment) live in dedicated
// index trees written with compare_and_swap, so a validate-then-insert
// race resolves to exactly one winner at the store.

mod admins;
mod appointments;
mod doctors;
mod eye_tests;
mod feedback;
mod medical_records;
mod medications;
mod notifications;
mod patients;
mod payments;
mod time_slots;


use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sled::{Db, Tree};

use crate::errors::{StoreError, StoreResult};

pub struct ClinicStore {
    db: Db,
    pub(crate) admins: Tree,
    pub(crate) doctors: Tree,
    pub(crate) patients: Tree,
    pub(crate) time_slots: Tree,
    pub(crate) appointments: Tree,
    pub(crate) payments: Tree,
    pub(crate) medical_records: Tree,
    pub(crate) prescription_items: Tree,
    pub(crate) medications: Tree,
    pub(crate) eye_tests: Tree,
    pub(crate) feedback: Tree,
    pub(crate) notifications: Tree,
    // unique indexes
    pub(crate) idx_admin_wallet: Tree,
    pub(crate) idx_doctor_email: Tree,
    pub(crate) idx_patient_phone: Tree,
    pub(crate) idx_doctor_bookings: Tree,
    pub(crate) idx_patient_bookings: Tree,
    pub(crate) idx_feedback_appointment: Tree,
}

impl ClinicStore {
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::from_db(sled::open(path)?)
    }

    /// In-memory store backed by a temporary sled database. Used by tests;
    /// dropped state is discarded.
    pub fn temporary() -> StoreResult<Self> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: Db) -> StoreResult<Self> {
        Ok(ClinicStore {
            admins: db.open_tree("admins")?,
            doctors: db.open_tree("doctors")?,
            patients: db.open_tree("patients")?,
            time_slots: db.open_tree("time_slots")?,
            appointments: db.open_tree("appointments")?,
            payments: db.open_tree("payments")?,
            medical_records: db.open_tree("medical_records")?,
            prescription_items: db.open_tree("prescription_items")?,
            medications: db.open_tree("medications")?,
            eye_tests: db.open_tree("eye_tests")?,
            feedback: db.open_tree("feedback")?,
            notifications: db.open_tree("notifications")?,
            idx_admin_wallet: db.open_tree("idx_admin_wallet")?,
            idx_doctor_email: db.open_tree("idx_doctor_email")?,
            idx_patient_phone: db.open_tree("idx_patient_phone")?,
            idx_doctor_bookings: db.open_tree("idx_doctor_bookings")?,
            idx_patient_bookings: db.open_tree("idx_patient_bookings")?,
            idx_feedback_appointment: db.open_tree("idx_feedback_appointment")?,
            db,
        })
    }

    pub(crate) fn next_id(&self) -> StoreResult<u64> {
        Ok(self.db.generate_id()?)
    }

    pub fn flush(&self) -> StoreResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

pub(crate) fn id_key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

pub(crate) fn id_from_bytes(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_be_bytes(buf)
}

/// Index key for the booking uniqueness constraints:
/// (owner id, time slot id, appointment date).
pub(crate) fn booking_key(owner_id: u64, time_slot_id: u64, date: NaiveDate) -> Vec<u8> {
    format!("{owner_id}/{time_slot_id}/{date}").into_bytes()
}

pub(crate) fn put<T: Serialize>(tree: &Tree, id: u64, value: &T) -> StoreResult<()> {
    tree.insert(id_key(id), serde_json::to_vec(value)?)?;
    Ok(())
}

pub(crate) fn read_opt<T: DeserializeOwned>(tree: &Tree, id: u64) -> StoreResult<Option<T>> {
    match tree.get(id_key(id))? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

pub(crate) fn fetch<T: DeserializeOwned>(
    tree: &Tree,
    id: u64,
    entity: &'static str,
) -> StoreResult<T> {
    read_opt(tree, id)?.ok_or(StoreError::NotFound(entity))
}

pub(crate) fn scan<T: DeserializeOwned>(tree: &Tree) -> StoreResult<Vec<T>> {
    let mut out = Vec::new();
    for item in tree.iter() {
        let (_, bytes) = item?;
        out.push(serde_json::from_slice(&bytes)?);
    }
    Ok(out)
}

/// Claims `key -> id` in a unique index. Exactly one concurrent caller can
/// win the compare_and_swap; a loser observing a different holder gets a
/// conflict. Re-claiming a key already held by `id` is a no-op.
pub(crate) fn reserve_unique(
    tree: &Tree,
    key: &[u8],
    id: u64,
    conflict: &str,
) -> StoreResult<()> {
    let id_bytes = id_key(id);
    match tree.compare_and_swap(key, None::<&[u8]>, Some(&id_bytes[..]))? {
        Ok(()) => Ok(()),
        Err(cas) => {
            if cas.current.as_deref() == Some(&id_bytes[..]) {
                Ok(())
            } else {
                Err(StoreError::Conflict(conflict.to_string()))
            }
        }
    }
}

/// Releases a unique index entry, but only if it is still held by `id`.
pub(crate) fn release_unique(tree: &Tree, key: &[u8], id: u64) -> StoreResult<()> {
    let id_bytes = id_key(id);
    // A mismatch means someone else holds the key now; leave it alone.
    let _ = tree.compare_and_swap(key, Some(&id_bytes[..]), None::<&[u8]>)?;
    Ok(())
}

/// Current holder of a unique index key, if any.
pub(crate) fn index_holder(tree: &Tree, key: &[u8]) -> StoreResult<Option<u64>> {
    Ok(tree.get(key)?.map(|v| id_from_bytes(&v)))
}
