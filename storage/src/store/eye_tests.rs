// storage/src/store/eye_tests.rs

use chrono::Utc;
use models::clinic::{EyeTest, EyeTestType, NewEyeTest};

use super::{ClinicStore, fetch, put, read_opt, scan};
use crate::errors::{StoreError, StoreResult};

impl ClinicStore {
    pub fn create_eye_test(&self, new: NewEyeTest) -> StoreResult<EyeTest> {
        if read_opt::<models::clinic::Patient>(&self.patients, new.patient_id)?.is_none() {
            return Err(StoreError::Reference("patient".to_string()));
        }
        let id = self.next_id()?;
        let test = EyeTest::from_new(id, new);
        put(&self.eye_tests, id, &test)?;
        Ok(test)
    }

    pub fn eye_test(&self, id: u64) -> StoreResult<EyeTest> {
        fetch(&self.eye_tests, id, "Eye test")
    }

    pub fn eye_tests(&self) -> StoreResult<Vec<EyeTest>> {
        let mut list: Vec<EyeTest> = scan(&self.eye_tests)?;
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    pub fn eye_tests_for_patient(&self, patient_id: u64) -> StoreResult<Vec<EyeTest>> {
        Ok(self
            .eye_tests()?
            .into_iter()
            .filter(|t| t.patient_id == patient_id)
            .collect())
    }

    pub fn update_eye_test(
        &self,
        id: u64,
        test_type: Option<EyeTestType>,
        result: Option<String>,
    ) -> StoreResult<EyeTest> {
        let mut test = self.eye_test(id)?;
        if let Some(test_type) = test_type {
            test.test_type = test_type;
        }
        if let Some(result) = result {
            test.result = Some(result);
        }
        test.updated_at = Utc::now();
        put(&self.eye_tests, id, &test)?;
        Ok(test)
    }

    pub fn delete_eye_test(&self, id: u64) -> StoreResult<()> {
        let _ = self.eye_test(id)?;
        self.eye_tests.remove(super::id_key(id))?;
        Ok(())
    }
}
