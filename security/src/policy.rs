// security/src/policy.rs
//
// Role-scoped authorization. Role checks gate which operations a caller may
// invoke; ownership checks additionally scope doctors and patients to rows
// carrying their own id. Violations are Forbidden (403), distinct from
// NotFound (404) which is reserved for rows that do not exist or do not
// belong to the expected parent.

use serde::{Deserialize, Serialize};

use models::errors::{ClinicError, ClinicResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Patient,
}

/// The caller's identity for one request, extracted from the JWT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub id: u64,
    pub role: Role,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> ClinicResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ClinicError::forbidden("perform this action"))
        }
    }

    pub fn require_role(&self, allowed: &[Role]) -> ClinicResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(ClinicError::forbidden("perform this action"))
        }
    }

    /// Doctors may only touch rows where `doctor_id` is their own id;
    /// admins pass, patients fail.
    pub fn ensure_doctor_owns(&self, doctor_id: u64, action: &str) -> ClinicResult<()> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Doctor if self.id == doctor_id => Ok(()),
            _ => Err(ClinicError::forbidden(action)),
        }
    }

    /// Patients may only touch rows where `patient_id` is their own id.
    pub fn ensure_patient_owns(&self, patient_id: u64, action: &str) -> ClinicResult<()> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Patient if self.id == patient_id => Ok(()),
            _ => Err(ClinicError::forbidden(action)),
        }
    }

    /// Row-level visibility for an appointment-shaped row: admin sees all,
    /// the owning doctor and the owning patient see their own.
    pub fn can_access_row(&self, patient_id: u64, doctor_id: u64) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Doctor => self.id == doctor_id,
            Role::Patient => self.id == patient_id,
        }
    }
}

/// Role-conditional field sourcing for `patient_id`: a patient always acts
/// as themselves (body ignored), an admin must name the patient, a doctor
/// cannot act as a patient at all.
pub fn effective_patient_id(ctx: &AuthContext, body_patient_id: Option<u64>) -> ClinicResult<u64> {
    match ctx.role {
        Role::Patient => Ok(ctx.id),
        Role::Admin => body_patient_id.ok_or_else(|| {
            ClinicError::Validation(
                "Patient ID is required when acting as admin".to_string(),
            )
        }),
        Role::Doctor => Err(ClinicError::forbidden("act on behalf of a patient")),
    }
}

/// Same sourcing rule for `doctor_id` (doctor from token, admin from body).
pub fn effective_doctor_id(ctx: &AuthContext, body_doctor_id: Option<u64>) -> ClinicResult<u64> {
    match ctx.role {
        Role::Doctor => Ok(ctx.id),
        Role::Admin => body_doctor_id.ok_or_else(|| {
            ClinicError::Validation(
                "Doctor ID is required when acting as admin".to_string(),
            )
        }),
        Role::Patient => Err(ClinicError::forbidden("act on behalf of a doctor")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role, id: u64) -> AuthContext {
        AuthContext { id, role }
    }

    #[test]
    fn patient_id_comes_from_token_for_patients() {
        let c = ctx(Role::Patient, 7);
        assert_eq!(effective_patient_id(&c, Some(99)).unwrap(), 7);
        assert_eq!(effective_patient_id(&c, None).unwrap(), 7);
    }

    #[test]
    fn admin_must_name_the_patient() {
        let c = ctx(Role::Admin, 1);
        assert_eq!(effective_patient_id(&c, Some(5)).unwrap(), 5);
        assert!(matches!(
            effective_patient_id(&c, None),
            Err(ClinicError::Validation(_))
        ));
    }

    #[test]
    fn doctor_cannot_act_as_patient() {
        let c = ctx(Role::Doctor, 3);
        assert!(matches!(
            effective_patient_id(&c, Some(5)),
            Err(ClinicError::Forbidden(_))
        ));
    }

    #[test]
    fn ownership_checks_scope_by_role() {
        let doctor = ctx(Role::Doctor, 2);
        assert!(doctor.ensure_doctor_owns(2, "view").is_ok());
        assert!(doctor.ensure_doctor_owns(3, "view").is_err());
        assert!(doctor.can_access_row(9, 2));
        assert!(!doctor.can_access_row(9, 4));

        let patient = ctx(Role::Patient, 9);
        assert!(patient.ensure_patient_owns(9, "view").is_ok());
        assert!(patient.ensure_patient_owns(8, "view").is_err());

        let admin = ctx(Role::Admin, 1);
        assert!(admin.ensure_doctor_owns(77, "view").is_ok());
        assert!(admin.can_access_row(5, 6));
    }
}
