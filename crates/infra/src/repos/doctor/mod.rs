mod inmemory;
mod postgres;

pub use inmemory::InMemoryDoctorRepo;
pub use postgres::PostgresDoctorRepo;
use tapp_plus_domain::{Doctor, ID};

#[async_trait::async_trait]
pub trait IDoctorRepo: Send + Sync {
    async fn insert(&self, doctor: &Doctor) -> anyhow::Result<()>;
    async fn find(&self, doctor_id: &ID) -> anyhow::Result<Option<Doctor>>;
    async fn find_many(&self, doctor_ids: &[ID]) -> anyhow::Result<Vec<Doctor>>;
}
