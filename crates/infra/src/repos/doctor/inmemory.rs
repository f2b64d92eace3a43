use super::IDoctorRepo;
use crate::repos::shared::inmemory_repo::*;
use std::sync::Mutex;
use tapp_plus_domain::{Doctor, ID};

pub struct InMemoryDoctorRepo {
    doctors: Mutex<Vec<Doctor>>,
}

impl InMemoryDoctorRepo {
    pub fn new() -> Self {
        Self {
            doctors: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IDoctorRepo for InMemoryDoctorRepo {
    async fn insert(&self, doctor: &Doctor) -> anyhow::Result<()> {
        insert(doctor, &self.doctors);
        Ok(())
    }

    async fn find(&self, doctor_id: &ID) -> anyhow::Result<Option<Doctor>> {
        Ok(find(doctor_id, &self.doctors))
    }

    async fn find_many(&self, doctor_ids: &[ID]) -> anyhow::Result<Vec<Doctor>> {
        Ok(find_by(&self.doctors, |doctor| doctor_ids.contains(&doctor.id)))
    }
}
