//! Health check command for frontend monitoring

use crate::context::AppContext;
use crate::utils::health::HealthStatus;

/// Get application health status
///
/// # Example Response
/// ```json
/// {
///   "is_healthy": true,
///   "score": 1.0,
///   "message": null,
///   "components": [
///     { "name": "local_storage", "is_healthy": true, "message": null },
///     { "name": "failed_saves", "is_healthy": true, "message": "2 saves waiting for recovery" }
///   ],
///   "timestamp": 1698765432
/// }
/// ```
pub async fn get_app_health(context: &AppContext) -> Result<HealthStatus, String> {
    Ok(context.health_check().await)
}
