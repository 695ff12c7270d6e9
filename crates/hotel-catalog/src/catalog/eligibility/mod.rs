mod policy;

pub use policy::{check_ticket, AccessDenial, FailureKind};

use std::sync::Arc;

use super::domain::{EnrollmentId, UserId};
use super::repository::CatalogRepository;
use super::service::CatalogError;

/// Walks the enrollment, ticket and ticket type chain for a user.
///
/// Each lookup depends on the previous one, so the reads run strictly in order and stop at the
/// first missing link or failed check.
pub struct EligibilityEvaluator<R> {
    repository: Arc<R>,
}

impl<R> EligibilityEvaluator<R>
where
    R: CatalogRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Resolve the user's enrollment when their ticket grants hotel access.
    pub async fn evaluate(&self, user_id: UserId) -> Result<EnrollmentId, CatalogError> {
        let enrollment = self
            .repository
            .find_enrollment_by_user(user_id)
            .await?
            .ok_or(AccessDenial::EnrollmentNotFound(user_id))?;

        let purchase = self
            .repository
            .find_ticket_by_enrollment(enrollment.id)
            .await?
            .ok_or(AccessDenial::TicketNotFound(enrollment.id))?;

        check_ticket(&purchase)?;

        Ok(enrollment.id)
    }
}
