//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API,
//! registering the work order endpoints, the health probes, and the schemas
//! they reference. The generated specification backs Swagger UI in debug
//! builds.

use utoipa::OpenApi;

use crate::api::work_orders::{WorkOrderPage, WorkflowActionDto, WorkflowOutcomeDto};
use crate::domain::error::{AppError, ErrorCode};
use crate::domain::work_orders::{FollowUpAction, FollowUpKind, WorkOrder, WorkOrderDraft};

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Maintenance backend API",
        description = "HTTP interface for work order management and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::api::work_orders::list,
        crate::api::work_orders::get,
        crate::api::work_orders::create,
        crate::api::work_orders::update,
        crate::api::work_orders::remove,
        crate::api::work_orders::workflow,
        crate::api::health::ready,
        crate::api::health::live,
    ),
    components(schemas(
        WorkOrder,
        WorkOrderDraft,
        WorkOrderPage,
        WorkflowActionDto,
        WorkflowOutcomeDto,
        FollowUpAction,
        FollowUpKind,
        AppError,
        ErrorCode,
    )),
    tags(
        (name = "work-orders", description = "Work order CRUD and workflow transitions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]

    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::ApiDoc;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn work_order_schema_has_workflow_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get("WorkOrder").expect("WorkOrder schema");

        assert_object_schema_has_field(schema, "id");
        assert_object_schema_has_field(schema, "status");
        assert_object_schema_has_field(schema, "assigned_to");
    }

    #[test]
    fn error_schema_has_envelope_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get("AppError").expect("AppError schema");

        assert_object_schema_has_field(schema, "code");
        assert_object_schema_has_field(schema, "message");
        assert_object_schema_has_field(schema, "status");
    }

    #[test]
    fn every_work_order_endpoint_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/v1/work-orders"));
        assert!(paths.contains_key("/api/v1/work-orders/{id}"));
        assert!(paths.contains_key("/api/v1/work-orders/{id}/workflow"));
        assert!(paths.contains_key("/health/ready"));
    }
}
