use std::sync::Arc;

use tracing::debug;

use shared_database::{collections, AppContext, Collection, Filter};
use shared_models::error::AppError;

use crate::models::{AppointmentService, Info, Specialty};

/// Read-only access to the clinic catalog: info cards, services and the
/// specialty list derived from service names.
pub struct CatalogService {
    infos: Collection<Info>,
    services: Collection<AppointmentService>,
}

impl CatalogService {
    pub fn new(ctx: &Arc<AppContext>) -> Self {
        Self {
            infos: ctx.collection(collections::INFOS),
            services: ctx.collection(collections::APPOINTMENT_SERVICES),
        }
    }

    pub async fn list_infos(&self) -> Result<Vec<Info>, AppError> {
        Ok(self.infos.find(&Filter::all()).await?)
    }

    pub async fn get_service(&self, id: &str) -> Result<AppointmentService, AppError> {
        debug!("Fetching appointment service {}", id);

        self.services
            .find_one(&Filter::by_id(id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment service {} not found", id)))
    }

    pub async fn list_specialties(&self) -> Result<Vec<Specialty>, AppError> {
        Ok(self.services.find_projected(&Filter::all(), &["name"]).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_utils::test_utils::TestContext;

    #[tokio::test]
    async fn test_specialties_only_carry_id_and_name() {
        let context = TestContext::default();
        context
            .seed(
                collections::APPOINTMENT_SERVICES,
                vec![json!({ "_id": "s1", "name": "Teeth Orthodontics", "slots": ["8am"], "price": 20 })],
            )
            .await;

        let specialties = CatalogService::new(&context.ctx).list_specialties().await.unwrap();
        assert_eq!(
            specialties,
            vec![Specialty {
                id: "s1".to_string(),
                name: "Teeth Orthodontics".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_unknown_service_is_not_found() {
        let context = TestContext::default();
        let result = CatalogService::new(&context.ctx).get_service("nope").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
