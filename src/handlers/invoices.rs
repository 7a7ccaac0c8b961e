// src/handlers/invoices.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::files::{file_response, read_upload, FileKind, UploadForm},
    middleware::role::{ManagerRole, RequireRole},
    models::{
        enriched::EnrichedInvoice,
        invoice::{
            CreateInvoicePayload, Invoice, UpdateInvoicePayload, UpdateInvoiceStatusPayload,
            WhatsappLinkResponse,
        },
    },
    services::listing::{paginate, ListQuery, Page},
};

/// Os totais são sempre calculados no servidor (IVA de 21%).
#[utoipa::path(
    post,
    path = "/api/manage/invoices",
    tag = "Invoices",
    request_body = CreateInvoicePayload,
    responses(
        (status = 201, description = "Fatura criada", body = Invoice),
        (status = 400, description = "Itens inválidos ou veículo inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_invoice(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Json(payload): Json<CreateInvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let invoice = app_state.invoice_service.create_invoice(payload).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

#[utoipa::path(
    get,
    path = "/api/manage/invoices",
    tag = "Invoices",
    params(ListQuery),
    responses((status = 200, description = "Faturas paginadas", body = Page<EnrichedInvoice>)),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<EnrichedInvoice>>, AppError> {
    let invoices = app_state.invoice_service.list_enriched().await?;
    Ok(Json(paginate(invoices, &query)))
}

#[utoipa::path(
    get,
    path = "/api/manage/invoices/{id}",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "Fatura", body = Invoice),
        (status = 404, description = "Fatura não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_invoice(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, AppError> {
    Ok(Json(app_state.invoice_service.get_invoice(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/manage/invoices/{id}",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    request_body = UpdateInvoicePayload,
    responses(
        (status = 200, description = "Fatura atualizada", body = Invoice),
        (status = 404, description = "Fatura não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_invoice(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInvoicePayload>,
) -> Result<Json<Invoice>, AppError> {
    payload.validate()?;

    let invoice = app_state.invoice_service.update_invoice(id, payload).await?;
    Ok(Json(invoice))
}

#[utoipa::path(
    patch,
    path = "/api/manage/invoices/{id}/status",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    request_body = UpdateInvoiceStatusPayload,
    responses((status = 200, description = "Estado alterado", body = Invoice)),
    security(("api_jwt" = []))
)]
pub async fn set_invoice_status(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInvoiceStatusPayload>,
) -> Result<Json<Invoice>, AppError> {
    let invoice = app_state.invoice_service.set_status(id, payload.status).await?;
    Ok(Json(invoice))
}

#[utoipa::path(
    delete,
    path = "/api/manage/invoices/{id}",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 204, description = "Fatura excluída"),
        (status = 404, description = "Fatura não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_invoice(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.invoice_service.delete_invoice(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/manage/invoices/{id}/pdf",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses((status = 200, description = "PDF anexado", body = Invoice)),
    security(("api_jwt" = []))
)]
pub async fn upload_invoice_pdf(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Invoice>, AppError> {
    let upload = read_upload(multipart, FileKind::Pdf).await?;
    let invoice = app_state
        .invoice_service
        .attach_pdf(id, &upload.filename, upload.data)
        .await?;
    Ok(Json(invoice))
}

#[utoipa::path(
    post,
    path = "/api/manage/invoices/{id}/pdf/generate",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "PDF gerado e anexado", body = Invoice),
        (status = 500, description = "Fonte ausente ou falha na renderização")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_invoice_pdf(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, AppError> {
    let invoice = app_state.invoice_service.generate_pdf(id).await?;
    Ok(Json(invoice))
}

#[utoipa::path(
    get,
    path = "/api/manage/invoices/{id}/pdf",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "PDF da fatura", content_type = "application/pdf"),
        (status = 404, description = "Fatura sem PDF")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_invoice_pdf(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state.invoice_service.get_invoice(id).await?;
    let (path, data) = app_state.invoice_service.download_pdf(&invoice).await?;
    Ok(file_response(&path, data))
}

#[utoipa::path(
    get,
    path = "/api/manage/invoices/{id}/whatsapp",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "Link wa.me com a mensagem", body = WhatsappLinkResponse),
        (status = 400, description = "Cliente sem telefone")
    ),
    security(("api_jwt" = []))
)]
pub async fn invoice_whatsapp_link(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<WhatsappLinkResponse>, AppError> {
    let url = app_state.invoice_service.whatsapp_link(id).await?;
    Ok(Json(WhatsappLinkResponse { url }))
}
