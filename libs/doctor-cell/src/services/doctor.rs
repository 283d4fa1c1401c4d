use std::sync::Arc;

use tracing::{debug, info};

use shared_database::{collections, AppContext, Collection, Filter};
use shared_models::error::AppError;
use shared_models::store::{DeleteResult, InsertOneResult};

use crate::models::Doctor;

pub struct DoctorService {
    doctors: Collection<Doctor>,
}

impl DoctorService {
    pub fn new(ctx: &Arc<AppContext>) -> Self {
        Self {
            doctors: ctx.collection(collections::DOCTORS),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, AppError> {
        Ok(self.doctors.find(&Filter::all()).await?)
    }

    pub async fn add_doctor(&self, mut doctor: Doctor) -> Result<InsertOneResult, AppError> {
        doctor.id = None;
        let result = self.doctors.insert_one(&doctor).await?;
        info!("Added doctor {} ({})", doctor.name, result.inserted_id);
        Ok(result)
    }

    /// Deleting an unknown id is not an error; `deletedCount` is 0.
    pub async fn remove_doctor(&self, id: &str) -> Result<DeleteResult, AppError> {
        let result = self.doctors.delete_one(&Filter::by_id(id)).await?;
        debug!("Removed {} doctor(s) with id {}", result.deleted_count, id);
        Ok(result)
    }
}
