//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use barter::{
    Session,
    authoring::{AuthoringOutcome, OfferAuthoring},
    exchange::{ExchangeRequestForm, SubmitOutcome},
    listing::{CategoryFilter, ListingQuery, OfferListing, OwnOffers},
    profile::{ProfileViewModel, SaveOutcome},
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::auth_middleware,
    models::{
        CreateOfferRequest, ExchangeRequestPayload, OfferListParams, OfferListResponse,
        ProfileResponse, UpdateProfileRequest,
    },
    state::AppState,
};


/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/offers", get(list_offers).post(create_offer))
        .route("/offers/mine", get(list_my_offers))
        .route("/offers/:id/exchange-requests", post(request_exchange))
        .route("/profile", get(get_profile).put(update_profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "barterlink-api"
    }))
}

/// Feed of everyone else's offers, filtered by search and category
pub async fn list_offers(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(params): Query<OfferListParams>,
) -> ApiResult<impl IntoResponse> {
    let category = match params.category.as_deref() {
        None | Some("") => CategoryFilter::All,
        Some(value) => value
            .parse::<CategoryFilter>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
    };

    let mut listing = OfferListing::new(state.offer_gateway.clone(), Some(session));
    listing.activate().await;
    listing.set_query(ListingQuery::new(
        params.search.unwrap_or_default(),
        category,
    ));

    let items: Vec<_> = listing.visible().into_iter().cloned().collect();
    Ok(Json(OfferListResponse::from(items)))
}

/// The viewer's own offers
pub async fn list_my_offers(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<impl IntoResponse> {
    let mut own = OwnOffers::new(state.offer_gateway.clone(), Some(session));
    own.activate().await;

    Ok(Json(OfferListResponse::from(own.offers().to_vec())))
}

/// Create a new offer or request
pub async fn create_offer(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<CreateOfferRequest>,
) -> ApiResult<impl IntoResponse> {
    let draft = payload.into_draft()?;

    let authoring = OfferAuthoring::new(state.offer_gateway.clone(), Some(session));
    match authoring.submit(&draft).await? {
        AuthoringOutcome::Created { offer, destination } => Ok((
            StatusCode::CREATED,
            [(header::LOCATION, destination.path())],
            Json(offer),
        )),
        AuthoringOutcome::Skipped => Err(ApiError::BadRequest(
            "Offer could not be submitted".to_string(),
        )),
    }
}

/// Send an exchange request for an offer
pub async fn request_exchange(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExchangeRequestPayload>,
) -> ApiResult<impl IntoResponse> {
    let offer = state.offer_gateway.find_offer(id).await?;

    let mut form =
        ExchangeRequestForm::new(state.exchange_request_gateway.clone(), Some(session));
    form.set_message(payload.message.unwrap_or_default());

    match form.submit(offer.as_ref()).await? {
        SubmitOutcome::Sent(request) => Ok((StatusCode::CREATED, Json(request))),
        SubmitOutcome::Skipped => Err(ApiError::NotFound("Offer not found".to_string())),
    }
}

/// The viewer's profile and offer statistics
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<impl IntoResponse> {
    let mut profile = ProfileViewModel::new(
        state.profile_gateway.clone(),
        state.offer_gateway.clone(),
        Some(session),
    );
    profile.activate().await;

    Ok(Json(ProfileResponse {
        profile: profile.profile().clone(),
        stats: profile.stats(),
    }))
}

/// Save the viewer's name and bio
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_id = session.user_id();
    let mut profile = ProfileViewModel::new(
        state.profile_gateway.clone(),
        state.offer_gateway.clone(),
        Some(session),
    );
    profile.try_load_profile().await?;
    profile.set_full_name(payload.full_name);
    profile.set_bio(payload.bio);

    match profile.save().await? {
        SaveOutcome::Saved(saved) => {
            info!("Profile updated for {}", user_id);
            Ok(Json(saved))
        }
        SaveOutcome::Skipped => Err(ApiError::Unauthorized),
    }
}
