use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::clients::{ClientList, CreateClientRequest, UpdateClientRequest},
    entity::clients::{ActiveModel, Column, Entity as Clients, Model as ClientModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner},
    models::Client,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn create_client(
    state: &AppState,
    user: &AuthUser,
    payload: CreateClientRequest,
) -> AppResult<ApiResponse<Client>> {
    let existing = Clients::find()
        .filter(Column::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "Client {} already exists",
            payload.email
        )));
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        lastname: Set(payload.lastname),
        email: Set(payload.email),
        company: Set(payload.company),
        phone: Set(payload.phone),
        seller_id: Set(user.user_id),
        created_at: NotSet,
    };
    let client = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "client_create",
        Some("clients"),
        Some(serde_json::json!({ "client_id": client.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Client created",
        client_from_entity(client),
        Some(Meta::empty()),
    ))
}

pub async fn list_clients(state: &AppState) -> AppResult<ApiResponse<ClientList>> {
    // Best-effort: backend errors degrade to an empty listing.
    let items = match Clients::find()
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await
    {
        Ok(models) => models.into_iter().map(client_from_entity).collect(),
        Err(err) => {
            tracing::warn!(error = %err, "client listing failed");
            Vec::new()
        }
    };

    Ok(ApiResponse::success(
        "Clients",
        ClientList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_clients_by_seller(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ClientList>> {
    let items = match Clients::find()
        .filter(Column::SellerId.eq(user.user_id))
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await
    {
        Ok(models) => models.into_iter().map(client_from_entity).collect(),
        Err(err) => {
            tracing::warn!(error = %err, "client listing failed");
            Vec::new()
        }
    };

    Ok(ApiResponse::success(
        "Clients",
        ClientList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_client(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Client>> {
    let client = find_owned_client(state, user, id).await?;
    Ok(ApiResponse::success(
        "Client",
        client_from_entity(client),
        None,
    ))
}

pub async fn update_client(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateClientRequest,
) -> AppResult<ApiResponse<Client>> {
    let existing = find_owned_client(state, user, id).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(lastname) = payload.lastname {
        active.lastname = Set(lastname);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(company) = payload.company {
        active.company = Set(company);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }

    let client = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "client_update",
        Some("clients"),
        Some(serde_json::json!({ "client_id": client.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        client_from_entity(client),
        Some(Meta::empty()),
    ))
}

pub async fn delete_client(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<String>> {
    let client = find_owned_client(state, user, id).await?;
    client.delete(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "client_delete",
        Some("clients"),
        Some(serde_json::json!({ "client_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        "Client deleted".to_string(),
        Some(Meta::empty()),
    ))
}

/// Resolves a client and enforces that the caller is its owning seller.
async fn find_owned_client(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ClientModel> {
    let client = Clients::find_by_id(id).one(&state.orm).await?;
    let client = match client {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };
    ensure_owner(user, client.seller_id)?;
    Ok(client)
}

pub fn client_from_entity(model: ClientModel) -> Client {
    Client {
        id: model.id,
        name: model.name,
        lastname: model.lastname,
        email: model.email,
        company: model.company,
        phone: model.phone,
        seller_id: model.seller_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
