//! Loan API handlers.
//!
//! ```text
//! GET    /api/loans
//! GET    /api/loans/{id}
//! GET    /api/loans/user/{userId}
//! POST   /api/loans {"amount":1000,"term":12,"type":1,"userId":5}
//! PUT    /api/loans/{id} {"amount":900,"term":6,"loanTypes":{"id":2},"loanStatus":{"id":1}}
//! DELETE /api/loans/{id}
//! PATCH  /api/loans/{loanId}/approve
//! PATCH  /api/loans/{loanId}/reject
//! ```
//!
//! Handlers check session presence and role gates, validate payload shape,
//! and leave ownership and lifecycle rules to the loan service.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::ports::{CreateLoanRequest, UpdateLoanRequest};
use crate::domain::{Decision, Error, LoanId, LoanStatusId, LoanTypeId, LoanView, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

const AMOUNT: FieldName = FieldName::new("amount");
const TERM: FieldName = FieldName::new("term");
const LOAN_TYPE: FieldName = FieldName::new("type");
const LOAN_TYPES: FieldName = FieldName::new("loanTypes");
const USER_ID: FieldName = FieldName::new("userId");

const AMOUNT_REQUIRED: &str = "Amount must not be null";
const LOAN_TYPE_REQUIRED: &str = "Loan type must not be null";
const UNAUTHORIZED_ACCESS: &str = "Unauthorized access";

/// Request body for `POST /api/loans`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanBody {
    #[schema(value_type = Option<String>, example = "1000.00")]
    pub amount: Option<Decimal>,
    #[schema(example = 12)]
    pub term: Option<i32>,
    /// Loan type id.
    #[serde(rename = "type")]
    #[schema(example = 1)]
    pub loan_type: Option<i64>,
    #[schema(example = 5)]
    pub user_id: Option<i64>,
}

impl CreateLoanBody {
    fn into_request(self) -> Result<CreateLoanRequest, Error> {
        Ok(CreateLoanRequest {
            amount: require(self.amount, AMOUNT, AMOUNT_REQUIRED)?,
            term: require(self.term, TERM, "Loan term must not be null")?,
            loan_type_id: LoanTypeId::new(require(
                self.loan_type,
                LOAN_TYPE,
                LOAN_TYPE_REQUIRED,
            )?),
            user_id: UserId::new(require(self.user_id, USER_ID, "User id must not be null")?),
            status_id: LoanStatusId::PENDING,
        })
    }
}

/// Nested `{ "id": ... }` reference used by the update body.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ReferenceId {
    pub id: Option<i64>,
}

/// Request body for `PUT /api/loans/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLoanBody {
    #[schema(value_type = Option<String>, example = "900.00")]
    pub amount: Option<Decimal>,
    pub term: Option<i32>,
    pub loan_types: Option<ReferenceId>,
    /// Replacement status; omitted keeps the current status.
    pub loan_status: Option<ReferenceId>,
}

impl UpdateLoanBody {
    fn into_request(self, loan_id: LoanId) -> Result<UpdateLoanRequest, Error> {
        let loan_type = self.loan_types.and_then(|reference| reference.id);
        Ok(UpdateLoanRequest {
            loan_id,
            amount: require(self.amount, AMOUNT, AMOUNT_REQUIRED)?,
            term: require(self.term, TERM, "Term must not be null")?,
            loan_type_id: LoanTypeId::new(require(loan_type, LOAN_TYPES, LOAN_TYPE_REQUIRED)?),
            status_id: self
                .loan_status
                .and_then(|reference| reference.id)
                .map(LoanStatusId::new),
        })
    }
}

/// Plain confirmation message.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// List every loan. Manager only.
#[utoipa::path(
    get,
    path = "/api/loans",
    responses(
        (status = 200, description = "All loans", body = [LoanView]),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Caller is not a manager", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["loans"],
    operation_id = "listLoans"
)]
#[get("/loans")]
pub async fn list_loans(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<LoanView>>> {
    let principal = session.require_principal()?;
    if !principal.is_manager() {
        info!(user_id = %principal.user_id(), "access denied to list all loans");
        return Err(Error::forbidden("Access Denied"));
    }
    let loans = state.loans_query.get_all_loans().await?;
    Ok(web::Json(loans))
}

/// Fetch one loan visible to the caller.
#[utoipa::path(
    get,
    path = "/api/loans/{id}",
    params(("id" = i64, Path, description = "Loan id")),
    responses(
        (status = 200, description = "Loan", body = LoanView),
        (status = 401, description = "Not logged in", body = Error),
        (status = 404, description = "Loan missing or not visible", body = Error)
    ),
    tags = ["loans"],
    operation_id = "getLoan"
)]
#[get("/loans/{id}")]
pub async fn get_loan(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<LoanView>> {
    let principal = session.require_principal()?;
    let loan = state
        .loans_query
        .get_loan_by_id(LoanId::new(path.into_inner()), &principal)
        .await?;
    Ok(web::Json(loan))
}

/// List the loans owned by a user. Owner or manager only.
#[utoipa::path(
    get,
    path = "/api/loans/user/{userId}",
    params(("userId" = i64, Path, description = "Owner id")),
    responses(
        (status = 200, description = "Loans owned by the user", body = [LoanView]),
        (status = 401, description = "Not logged in or not permitted", body = Error),
        (status = 404, description = "User has no loans", body = Error)
    ),
    tags = ["loans"],
    operation_id = "listUserLoans"
)]
#[get("/loans/user/{userId}")]
pub async fn list_user_loans(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<LoanView>>> {
    let principal = session.require_principal()?;
    let user_id = UserId::new(path.into_inner());
    if !principal.may_access(user_id) {
        warn!(
            user_id = %user_id,
            session_user_id = %principal.user_id(),
            "unauthorized access to user loans"
        );
        return Err(Error::unauthorized(UNAUTHORIZED_ACCESS));
    }
    let loans = state.loans_query.get_loans_by_user_id(user_id).await?;
    if loans.is_empty() {
        return Err(Error::not_found(format!("No loans found for user id: {user_id}")));
    }
    Ok(web::Json(loans))
}

/// Create a loan for the logged-in user.
#[utoipa::path(
    post,
    path = "/api/loans",
    request_body = CreateLoanBody,
    responses(
        (status = 201, description = "Loan created", body = LoanView),
        (status = 400, description = "Missing field or unknown reference", body = Error),
        (status = 401, description = "Not logged in or userId mismatch", body = Error)
    ),
    tags = ["loans"],
    operation_id = "createLoan"
)]
#[post("/loans")]
pub async fn create_loan(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateLoanBody>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let request = payload.into_inner().into_request()?;
    if request.user_id != principal.user_id() {
        warn!(
            user_id = %request.user_id,
            session_user_id = %principal.user_id(),
            "unauthorized attempt to create loan for another user"
        );
        return Err(Error::unauthorized(UNAUTHORIZED_ACCESS));
    }
    let loan = state.loans.create_loan(request).await?;
    Ok(HttpResponse::Created().json(loan))
}

/// Overwrite a loan owned by the caller.
#[utoipa::path(
    put,
    path = "/api/loans/{id}",
    params(("id" = i64, Path, description = "Loan id")),
    request_body = UpdateLoanBody,
    responses(
        (status = 200, description = "Loan updated", body = LoanView),
        (status = 400, description = "Missing field or unknown reference", body = Error),
        (status = 401, description = "Not logged in or not the owner", body = Error),
        (status = 404, description = "Loan not found", body = Error)
    ),
    tags = ["loans"],
    operation_id = "updateLoan"
)]
#[put("/loans/{id}")]
pub async fn update_loan(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<UpdateLoanBody>,
) -> ApiResult<web::Json<LoanView>> {
    let principal = session.require_principal()?;
    let request = payload
        .into_inner()
        .into_request(LoanId::new(path.into_inner()))?;
    let loan = state.loans.update_loan(request, &principal).await?;
    Ok(web::Json(loan))
}

/// Delete a loan owned by the caller unless it is approved.
#[utoipa::path(
    delete,
    path = "/api/loans/{id}",
    params(("id" = i64, Path, description = "Loan id")),
    responses(
        (status = 200, description = "Loan deleted", body = MessageResponse),
        (status = 401, description = "Not logged in, not the owner, missing or approved", body = Error)
    ),
    tags = ["loans"],
    operation_id = "deleteLoan"
)]
#[delete("/loans/{id}")]
pub async fn delete_loan(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let principal = session.require_principal()?;
    let deleted = state
        .loans
        .delete_loan(LoanId::new(path.into_inner()), &principal)
        .await?;
    if !deleted {
        return Err(Error::unauthorized("Loan not found or is approved"));
    }
    Ok(web::Json(MessageResponse {
        message: "Loan successfully deleted".to_owned(),
    }))
}

async fn decide(
    state: &HttpState,
    session: &SessionContext,
    loan_id: LoanId,
    decision: Decision,
) -> ApiResult<web::Json<LoanView>> {
    let principal = session.require_principal()?;
    if !principal.is_manager() {
        warn!(loan_id = %loan_id, %decision, "non-manager attempted a loan decision");
        return Err(Error::unauthorized(UNAUTHORIZED_ACCESS));
    }
    let loan = state.loans.approve_or_reject_loan(loan_id, decision).await?;
    Ok(web::Json(loan))
}

/// Approve a loan. Manager only.
#[utoipa::path(
    patch,
    path = "/api/loans/{loanId}/approve",
    params(("loanId" = i64, Path, description = "Loan id")),
    responses(
        (status = 200, description = "Loan approved", body = LoanView),
        (status = 401, description = "Not logged in or not a manager", body = Error),
        (status = 404, description = "Loan not found", body = Error)
    ),
    tags = ["loans"],
    operation_id = "approveLoan"
)]
#[patch("/loans/{loanId}/approve")]
pub async fn approve_loan(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<LoanView>> {
    decide(
        &state,
        &session,
        LoanId::new(path.into_inner()),
        Decision::Approve,
    )
    .await
}

/// Reject a loan. Manager only.
#[utoipa::path(
    patch,
    path = "/api/loans/{loanId}/reject",
    params(("loanId" = i64, Path, description = "Loan id")),
    responses(
        (status = 200, description = "Loan rejected", body = LoanView),
        (status = 401, description = "Not logged in or not a manager", body = Error),
        (status = 404, description = "Loan not found", body = Error)
    ),
    tags = ["loans"],
    operation_id = "rejectLoan"
)]
#[patch("/loans/{loanId}/reject")]
pub async fn reject_loan(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<LoanView>> {
    decide(
        &state,
        &session,
        LoanId::new(path.into_inner()),
        Decision::Reject,
    )
    .await
}
