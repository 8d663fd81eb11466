//! Lifecycle endpoints.

use super::AppState;
use crate::domain::dto::{
    ArchiveRequest, ArchiveResponse, ArchivedContractsResponse, CompileResponse, DeployRequest,
    DeployResponse, UpdateStateRequest, UpdateStateResponse,
};
use crate::domain::error::ApiError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Multipart, Path, State};
use axum::Json;
use shared_types::{Address, ContractRecord};
use tracing::info;

/// Multipart field carrying the source file.
const SOURCE_FIELD: &str = "file";

pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::invalid_request(rejection.body_text()))
}

/// `POST /compile-contract`
pub async fn compile(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CompileResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::invalid_request(e.body_text()))?;
    let mut source = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_request(e.body_text()))?
    {
        if field.name() != Some(SOURCE_FIELD) {
            continue;
        }
        if let Some(file_name) = field.file_name() {
            if !file_name.ends_with(".sol") {
                return Err(ApiError::invalid_request(format!(
                    "expected a .sol file, got {file_name}"
                )));
            }
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::invalid_request(e.body_text()))?;
        source = Some(bytes);
        break;
    }
    let source = source
        .ok_or_else(|| ApiError::invalid_request(format!("missing multipart field `{SOURCE_FIELD}`")))?;

    let artifact = state.lifecycle.compile(&source).await?;
    info!(contract = %artifact.name, "Compiled");
    Ok(Json(CompileResponse {
        contract_name: artifact.name,
        abi: artifact.abi,
    }))
}

/// `POST /deploy-contract`
pub async fn deploy(
    State(state): State<AppState>,
    payload: Result<Json<DeployRequest>, JsonRejection>,
) -> Result<Json<DeployResponse>, ApiError> {
    let request = json_body(payload)?;
    let outcome = state
        .lifecycle
        .deploy(&request.contract_name, &request.constructor_args)
        .await?;
    Ok(Json(DeployResponse {
        address: outcome.address,
        transaction_hash: outcome.tx_hash,
        registration_transaction_hash: outcome.registration_tx,
        gas_used: outcome.gas_used,
    }))
}

/// `POST /archive-contract`
pub async fn archive(
    State(state): State<AppState>,
    payload: Result<Json<ArchiveRequest>, JsonRejection>,
) -> Result<Json<ArchiveResponse>, ApiError> {
    let request = json_body(payload)?;
    let content_id = state.lifecycle.archive(request.contract_address).await?;
    Ok(Json(ArchiveResponse {
        contract_address: request.contract_address,
        content_id,
    }))
}

/// `POST /update-contract-state`
///
/// Writes the state directly. Operator escape hatch; no transition checks.
pub async fn update_state(
    State(state): State<AppState>,
    payload: Result<Json<UpdateStateRequest>, JsonRejection>,
) -> Result<Json<UpdateStateResponse>, ApiError> {
    let request = json_body(payload)?;
    let transaction_hash = state
        .lifecycle
        .update_state(request.contract_address, request.new_state, &request.content_id)
        .await?;
    Ok(Json(UpdateStateResponse {
        contract_address: request.contract_address,
        new_state: request.new_state,
        content_id: request.content_id,
        transaction_hash,
    }))
}

/// `GET /contract-state/:address`
pub async fn get_state(
    State(state): State<AppState>,
    address: Result<Path<Address>, PathRejection>,
) -> Result<Json<ContractRecord>, ApiError> {
    let Path(address) = address.map_err(|e| ApiError::invalid_request(e.body_text()))?;
    Ok(Json(state.lifecycle.get_state(address).await?))
}

/// `GET /archived-contracts`
pub async fn list_archived(
    State(state): State<AppState>,
) -> Result<Json<ArchivedContractsResponse>, ApiError> {
    let listing = state.lifecycle.list_archived().await?;
    Ok(Json(ArchivedContractsResponse {
        archived_contracts: listing.archived,
        failures: listing.failures,
    }))
}
