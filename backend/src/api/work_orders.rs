//! Work order API handlers.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};

use pagination::{Page, PageRequest, SortOrder, SortSpec};

use crate::api::error::ApiResult;
use crate::domain::error::AppError;
use crate::domain::repository::Patch;
use crate::domain::work_orders::{
    FollowUpAction, WorkOrder, WorkOrderDraft, WorkOrderStatus, WorkflowAction, WorkflowOutcome,
};
use crate::server::AppContext;

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// 1-based page number; defaults to the first page.
    pub page: Option<u32>,
    /// Page size; capped server-side.
    pub limit: Option<u32>,
    /// Field to order by.
    pub sort_by: Option<String>,
    /// `asc` or `desc`; defaults to ascending.
    pub sort_order: Option<String>,
    /// Restrict the scan to one tenant.
    pub tenant_id: Option<String>,
}

impl ListQuery {
    fn page_request(&self) -> Result<PageRequest, AppError> {
        let mut request = PageRequest::new(
            self.page.unwrap_or(pagination::DEFAULT_PAGE),
            self.limit.unwrap_or(pagination::DEFAULT_LIMIT),
        )
        .map_err(|err| AppError::invalid_request(err.to_string()))?;

        if let Some(field) = self.sort_by.as_deref() {
            let order = match self.sort_order.as_deref() {
                None | Some("asc") => SortOrder::Asc,
                Some("desc") => SortOrder::Desc,
                Some(other) => {
                    return Err(AppError::invalid_request(format!(
                        "unknown sort order {other:?}; use \"asc\" or \"desc\""
                    )));
                }
            };
            let sort = SortSpec::new(field, order)
                .map_err(|err| AppError::invalid_request(err.to_string()))?;
            request = request.with_sort(sort);
        }
        Ok(request)
    }
}

/// One page of work orders with pagination metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct WorkOrderPage {
    /// Work orders on this page.
    pub items: Vec<WorkOrder>,
    /// 1-based page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// Total matching work orders across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl From<Page<WorkOrder>> for WorkOrderPage {
    fn from(page: Page<WorkOrder>) -> Self {
        Self {
            items: page.items,
            page: page.page,
            limit: page.limit,
            total: page.total,
            total_pages: page.total_pages,
        }
    }
}

/// Wire form of a workflow action request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WorkflowActionDto {
    /// Start the work order.
    Start,
    /// Complete the work order.
    Complete,
    /// Cancel the work order.
    Cancel {
        /// Optional cancellation reason.
        #[serde(default)]
        reason: Option<String>,
    },
    /// Assign the work order.
    Assign {
        /// Who to assign the work order to.
        assignee: String,
    },
}

impl From<WorkflowActionDto> for WorkflowAction {
    fn from(dto: WorkflowActionDto) -> Self {
        match dto {
            WorkflowActionDto::Start => Self::Start,
            WorkflowActionDto::Complete => Self::Complete,
            WorkflowActionDto::Cancel { reason } => Self::Cancel { reason },
            WorkflowActionDto::Assign { assignee } => Self::Assign { assignee },
        }
    }
}

/// Wire form of a workflow outcome.
#[derive(Debug, Serialize, ToSchema)]
pub struct WorkflowOutcomeDto {
    /// Whether the transition committed.
    pub success: bool,
    /// New primary state, when the transition changed it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_state: Option<WorkOrderStatus>,
    /// Suggested follow-up actions.
    pub follow_ups: Vec<FollowUpAction>,
    /// Rejection reasons; empty on success.
    pub errors: Vec<String>,
}

impl From<WorkflowOutcome> for WorkflowOutcomeDto {
    fn from(outcome: WorkflowOutcome) -> Self {
        match outcome {
            WorkflowOutcome::Applied {
                next_state,
                follow_ups,
            } => Self {
                success: true,
                next_state,
                follow_ups,
                errors: Vec::new(),
            },
            WorkflowOutcome::Rejected { errors } => Self {
                success: false,
                next_state: None,
                follow_ups: Vec::new(),
                errors,
            },
        }
    }
}

/// List work orders, optionally scoped to one tenant.
#[utoipa::path(
    get,
    path = "/api/v1/work-orders",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of work orders", body = WorkOrderPage),
        (status = 400, description = "Malformed pagination or sort parameters", body = crate::domain::error::AppError),
        (status = 503, description = "Record store unavailable", body = crate::domain::error::AppError)
    ),
    tags = ["work-orders"],
    operation_id = "listWorkOrders"
)]
#[get("/api/v1/work-orders")]
pub async fn list(
    ctx: web::Data<AppContext>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<WorkOrderPage>> {
    let request = query.page_request()?;
    let repository = ctx.work_orders.repository();
    let page = match query.tenant_id.as_deref() {
        Some(tenant_id) => repository.find_by_tenant(tenant_id, &request).await?,
        None => repository.find_all(&request).await?,
    };
    Ok(web::Json(page.into()))
}

/// Fetch one work order by id.
#[utoipa::path(
    get,
    path = "/api/v1/work-orders/{id}",
    params(("id" = String, Path, description = "Work order identifier")),
    responses(
        (status = 200, description = "The work order", body = WorkOrder),
        (status = 404, description = "Unknown work order", body = crate::domain::error::AppError)
    ),
    tags = ["work-orders"],
    operation_id = "getWorkOrder"
)]
#[get("/api/v1/work-orders/{id}")]
pub async fn get(
    ctx: web::Data<AppContext>,
    id: web::Path<String>,
) -> ApiResult<web::Json<WorkOrder>> {
    let order = ctx.work_orders.repository().find_by_id(&id).await?;
    Ok(web::Json(order))
}

/// Create a work order from a draft.
#[utoipa::path(
    post,
    path = "/api/v1/work-orders",
    request_body = WorkOrderDraft,
    responses(
        (status = 201, description = "Created work order", body = WorkOrder),
        (status = 503, description = "Record store unavailable", body = crate::domain::error::AppError)
    ),
    tags = ["work-orders"],
    operation_id = "createWorkOrder"
)]
#[post("/api/v1/work-orders")]
pub async fn create(
    ctx: web::Data<AppContext>,
    draft: web::Json<WorkOrderDraft>,
) -> ApiResult<HttpResponse> {
    let created = ctx.work_orders.repository().create(&draft).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Partially update a work order.
///
/// The body is a free-form JSON object; only the supplied fields change, and
/// the store-owned fields are stripped before the patch is applied.
#[utoipa::path(
    patch,
    path = "/api/v1/work-orders/{id}",
    params(("id" = String, Path, description = "Work order identifier")),
    request_body = Object,
    responses(
        (status = 200, description = "Updated work order", body = WorkOrder),
        (status = 400, description = "Empty update", body = crate::domain::error::AppError),
        (status = 404, description = "Unknown work order", body = crate::domain::error::AppError)
    ),
    tags = ["work-orders"],
    operation_id = "updateWorkOrder"
)]
#[patch("/api/v1/work-orders/{id}")]
pub async fn update(
    ctx: web::Data<AppContext>,
    id: web::Path<String>,
    body: web::Json<Map<String, Value>>,
) -> ApiResult<web::Json<WorkOrder>> {
    let patch = Patch::from_object(body.into_inner());
    let updated = ctx.work_orders.repository().update(&id, &patch).await?;
    Ok(web::Json(updated))
}

/// Delete a work order. Deletion is independent of workflow state.
#[utoipa::path(
    delete,
    path = "/api/v1/work-orders/{id}",
    params(("id" = String, Path, description = "Work order identifier")),
    responses(
        (status = 204, description = "Work order deleted"),
        (status = 404, description = "Unknown work order", body = crate::domain::error::AppError)
    ),
    tags = ["work-orders"],
    operation_id = "deleteWorkOrder"
)]
#[delete("/api/v1/work-orders/{id}")]
pub async fn remove(ctx: web::Data<AppContext>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    ctx.work_orders.repository().delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Execute a workflow action against a work order.
///
/// Domain rejections come back as a 200 with `success: false`; only
/// repository faults use error statuses.
#[utoipa::path(
    post,
    path = "/api/v1/work-orders/{id}/workflow",
    params(("id" = String, Path, description = "Work order identifier")),
    request_body = WorkflowActionDto,
    responses(
        (status = 200, description = "Transition outcome", body = WorkflowOutcomeDto),
        (status = 503, description = "Record store unavailable", body = crate::domain::error::AppError)
    ),
    tags = ["work-orders"],
    operation_id = "executeWorkflowAction"
)]
#[post("/api/v1/work-orders/{id}/workflow")]
pub async fn workflow(
    ctx: web::Data<AppContext>,
    id: web::Path<String>,
    action: web::Json<WorkflowActionDto>,
) -> ApiResult<web::Json<WorkflowOutcomeDto>> {
    let outcome = ctx
        .work_orders
        .execute(&id, action.into_inner().into())
        .await?;
    Ok(web::Json(outcome.into()))
}
