use super::common::{redirect_to, FormOrJson, Mutation, ResponseMode};
use crate::{
    errors::ServiceError,
    services::phonebook::{
        PersonInput, PersonView, PhoneInput, PhoneSearchQuery, PhoneSearchResult, PhoneUpdate,
        PhoneView,
    },
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};

fn person_phones_url(person_id: i32) -> String {
    redirect_to(format!("/phonebook/persons/{}/phones", person_id))
}

fn entity_persons_url(person: &PersonView) -> String {
    redirect_to(format!(
        "/phonebook/entities/{}/{}/persons",
        person.entity_type, person.entity_id
    ))
}

/// Search phones by number, person name, owning company or all three
#[utoipa::path(
    get,
    path = "/api/v1/phonebook/search",
    summary = "Search phone book",
    params(PhoneSearchQuery),
    responses(
        (status = 200, description = "Matching phones, primary first", body = ApiResponse<Vec<PhoneSearchResult>>),
    ),
    tag = "phonebook"
)]
pub async fn search_phones(
    State(state): State<AppState>,
    Query(query): Query<PhoneSearchQuery>,
) -> ApiResult<Vec<PhoneSearchResult>> {
    let results = state.services.phonebook.search(&query).await?;
    Ok(Json(ApiResponse::success(results)))
}

#[utoipa::path(
    post,
    path = "/api/v1/phonebook/persons",
    summary = "Add concerned person",
    request_body(content = PersonInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Person added", body = crate::handlers::common::MutationResponse<PersonView>),
        (status = 303, description = "Person added, redirecting to the entity's persons"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Entity not found", body = crate::errors::ErrorResponse),
    ),
    tag = "phonebook"
)]
pub async fn add_person(
    State(state): State<AppState>,
    mode: ResponseMode,
    FormOrJson(input): FormOrJson<PersonInput>,
) -> Result<Mutation<PersonView>, ServiceError> {
    let person = state.services.phonebook.add_person(input).await?;
    let url = entity_persons_url(&person);
    Ok(Mutation::created(
        mode,
        format!("{} added", person.name),
        url,
        person,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/phonebook/persons/{id}/primary",
    summary = "Make person primary",
    params(("id" = i32, Path, description = "Concerned person id")),
    responses(
        (status = 200, description = "Person is now the entity's primary contact", body = crate::handlers::common::MutationResponse<PersonView>),
        (status = 303, description = "Redirecting to the entity's persons"),
        (status = 404, description = "Person not found", body = crate::errors::ErrorResponse),
    ),
    tag = "phonebook"
)]
pub async fn set_primary_person(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mode: ResponseMode,
) -> Result<Mutation<PersonView>, ServiceError> {
    let person = state.services.phonebook.set_primary_person(id).await?;
    let url = entity_persons_url(&person);
    Ok(Mutation::ok(
        mode,
        format!("{} is now the primary contact", person.name),
        url,
        person,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/phonebook/entities/{kind}/{id}/persons",
    summary = "List an entity's concerned persons",
    params(
        ("kind" = String, Path, description = "CONSIGNOR, CONSIGNEE, AGENT, DRIVER or OWNER"),
        ("id" = i32, Path, description = "Entity id"),
    ),
    responses(
        (status = 200, description = "Persons, primary first then by name", body = ApiResponse<Vec<PersonView>>),
        (status = 400, description = "Unknown entity type", body = crate::errors::ErrorResponse),
    ),
    tag = "phonebook"
)]
pub async fn list_entity_persons(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i32)>,
) -> ApiResult<Vec<PersonView>> {
    let persons = state.services.phonebook.list_persons(&kind, id).await?;
    Ok(Json(ApiResponse::success(persons)))
}

#[utoipa::path(
    get,
    path = "/api/v1/phonebook/entities/{kind}/{id}/phones",
    summary = "List an entity's phones",
    params(
        ("kind" = String, Path, description = "CONSIGNOR, CONSIGNEE, AGENT, DRIVER or OWNER"),
        ("id" = i32, Path, description = "Entity id"),
    ),
    responses(
        (status = 200, description = "Phones across all persons of the entity", body = ApiResponse<Vec<PhoneView>>),
        (status = 400, description = "Unknown entity type", body = crate::errors::ErrorResponse),
    ),
    tag = "phonebook"
)]
pub async fn list_entity_phones(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i32)>,
) -> ApiResult<Vec<PhoneView>> {
    let phones = state.services.phonebook.entity_phones(&kind, id).await?;
    Ok(Json(ApiResponse::success(phones)))
}

#[utoipa::path(
    get,
    path = "/api/v1/phonebook/persons/{id}/phones",
    summary = "List a person's phones",
    params(("id" = i32, Path, description = "Concerned person id")),
    responses(
        (status = 200, description = "Phones, primary first then by id", body = ApiResponse<Vec<PhoneView>>),
        (status = 404, description = "Person not found", body = crate::errors::ErrorResponse),
    ),
    tag = "phonebook"
)]
pub async fn list_person_phones(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<PhoneView>> {
    let phones = state.services.phonebook.list_phones(id).await?;
    Ok(Json(ApiResponse::success(phones)))
}

#[utoipa::path(
    post,
    path = "/api/v1/phonebook/phones",
    summary = "Add phone",
    request_body(content = PhoneInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Phone added", body = crate::handlers::common::MutationResponse<PhoneView>),
        (status = 303, description = "Phone added, redirecting to the person's phones"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Person not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Phone number already exists", body = crate::errors::ErrorResponse),
    ),
    tag = "phonebook"
)]
pub async fn add_phone(
    State(state): State<AppState>,
    mode: ResponseMode,
    FormOrJson(input): FormOrJson<PhoneInput>,
) -> Result<Mutation<PhoneView>, ServiceError> {
    let phone = state.services.phonebook.add_phone(input).await?;
    let url = person_phones_url(phone.concerned_person_id);
    Ok(Mutation::created(
        mode,
        format!("Phone {} added", phone.phone_number),
        url,
        phone,
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/phonebook/phones/{id}",
    summary = "Update phone",
    params(("id" = i32, Path, description = "Phone id")),
    request_body = PhoneUpdate,
    responses(
        (status = 200, description = "Phone updated", body = crate::handlers::common::MutationResponse<PhoneView>),
        (status = 303, description = "Phone updated, redirecting to the person's phones"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Phone not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Phone number already exists", body = crate::errors::ErrorResponse),
    ),
    tag = "phonebook"
)]
pub async fn update_phone(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mode: ResponseMode,
    FormOrJson(input): FormOrJson<PhoneUpdate>,
) -> Result<Mutation<PhoneView>, ServiceError> {
    let phone = state.services.phonebook.update_phone(id, input).await?;
    let url = person_phones_url(phone.concerned_person_id);
    Ok(Mutation::ok(
        mode,
        format!("Phone {} updated", phone.phone_number),
        url,
        phone,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/phonebook/phones/{id}/primary",
    summary = "Make phone primary",
    params(("id" = i32, Path, description = "Phone id")),
    responses(
        (status = 200, description = "Phone is now the person's primary number", body = crate::handlers::common::MutationResponse<PhoneView>),
        (status = 303, description = "Redirecting to the person's phones"),
        (status = 404, description = "Phone not found", body = crate::errors::ErrorResponse),
    ),
    tag = "phonebook"
)]
pub async fn set_primary_phone(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mode: ResponseMode,
) -> Result<Mutation<PhoneView>, ServiceError> {
    let phone = state.services.phonebook.set_primary_phone(id).await?;
    let url = person_phones_url(phone.concerned_person_id);
    Ok(Mutation::ok(
        mode,
        format!("{} is now the primary number", phone.phone_number),
        url,
        phone,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/phonebook/phones/{id}",
    summary = "Delete phone",
    params(("id" = i32, Path, description = "Phone id")),
    responses(
        (status = 200, description = "Phone deleted"),
        (status = 303, description = "Redirecting to the phone book search"),
        (status = 404, description = "Phone not found", body = crate::errors::ErrorResponse),
    ),
    tag = "phonebook"
)]
pub async fn delete_phone(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mode: ResponseMode,
) -> Result<Mutation<()>, ServiceError> {
    state.services.phonebook.delete_phone(id).await?;
    Ok(Mutation::done(
        mode,
        format!("Phone #{} deleted", id),
        redirect_to("/phonebook/search"),
    ))
}
