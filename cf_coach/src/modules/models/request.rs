use crate::modules::models::response::ErrorResponse;
use axum::{async_trait, extract::FromRequestParts, http::StatusCode, Json};
use cf_coach_libs::heatmap::HeatmapFilter;
use http::request::Parts;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::{Validate, ValidationError};

fn validate_filter(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<HeatmapFilter>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid heatmap filter"))
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct HeatmapQueryParameters {
    #[validate(range(min = 1970, max = 2100))]
    pub year: Option<i32>,
    #[validate(custom = "validate_filter")]
    pub filter: Option<String>,
}

impl HeatmapQueryParameters {
    pub fn filter(&self) -> HeatmapFilter {
        self.filter
            .as_deref()
            .and_then(|filter| filter.parse().ok())
            .unwrap_or_default()
    }
}

/// Query string extractor that rejects malformed or invalid parameters with
/// `400 Bad Request`.
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let value: T = serde_urlencoded::from_str(query).map_err(|rejection| {
            tracing::error!("Parsing error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(format!(
                    "invalid format query string: [{}]",
                    rejection
                ))),
            )
        })?;

        value.validate().map_err(|rejection| {
            tracing::error!("Validation error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    format!("Validation error: [{}]", rejection).replace('\n', ", "),
                )),
            )
        })?;

        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use http::Request;

    async fn extract(uri: &str) -> Result<HeatmapQueryParameters, StatusCode> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ValidatedQuery::<HeatmapQueryParameters>::from_request_parts(&mut parts, &())
            .await
            .map(|ValidatedQuery(params)| params)
            .map_err(|(status, _)| status)
    }

    #[test]
    fn test_deserialize() {
        let params: HeatmapQueryParameters =
            serde_urlencoded::from_str("year=2023&filter=C").unwrap();
        assert_eq!(
            params,
            HeatmapQueryParameters {
                year: Some(2023),
                filter: Some(String::from("C")),
            }
        );
        assert_eq!(params.filter(), HeatmapFilter::Contest);
        assert_eq!(HeatmapQueryParameters::default().filter(), HeatmapFilter::All);
    }

    #[tokio::test]
    async fn test_extract_valid_query() {
        let params = extract("/api/students/tourist/heatmap?year=2023&filter=practice")
            .await
            .unwrap();
        assert_eq!(params.year, Some(2023));
        assert_eq!(params.filter(), HeatmapFilter::Practice);

        let empty = extract("/api/students/tourist/heatmap").await.unwrap();
        assert_eq!(empty, HeatmapQueryParameters::default());
    }

    #[tokio::test]
    async fn test_reject_invalid_query() {
        assert_eq!(
            extract("/heatmap?year=1800").await,
            Err(StatusCode::BAD_REQUEST)
        );
        assert_eq!(
            extract("/heatmap?filter=weekly").await,
            Err(StatusCode::BAD_REQUEST)
        );
        assert_eq!(
            extract("/heatmap?year=abc").await,
            Err(StatusCode::BAD_REQUEST)
        );
    }
}
