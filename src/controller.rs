//! Submission flow: validated form → route distance → quote.

use thiserror::Error;
use tracing::info;

use crate::domain::{
    compute_quote, FormError, FormState, LocationResolver, PriceBreakdown, QuoteRequest, RouteError,
};

#[derive(Clone, Debug, PartialEq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("Error calculating distance: {0}")]
    Route(#[from] RouteError),
    #[error("Location provider unavailable; check Settings.")]
    ProviderUnavailable,
}

/// Validate `form` and, only if it is complete, ask the provider for a quote.
///
/// Form errors take precedence over a missing provider.
pub async fn submit_form<R: LocationResolver>(
    resolver: Option<&R>,
    form: &FormState,
) -> Result<PriceBreakdown, SubmitError> {
    let request = form.prepare_submission()?;
    let resolver = resolver.ok_or(SubmitError::ProviderUnavailable)?;
    request_quote(resolver, request).await
}

/// Fetch the driving distance for `request` and price the shipment.
///
/// A route failure aborts the quote; nothing is retried.
pub async fn request_quote<R: LocationResolver>(
    resolver: &R,
    request: QuoteRequest,
) -> Result<PriceBreakdown, SubmitError> {
    let distance_km = resolver
        .route_distance_km(request.from, request.to)
        .await?;
    let breakdown = compute_quote(&request.into_shipment(distance_km));
    info!(
        distance_km,
        package_type = %request.package_type,
        total = breakdown.total_price,
        "quote computed"
    );
    Ok(breakdown)
}
