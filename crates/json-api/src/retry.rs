//! Retryable failure responses.

use salvo::{
    http::{
        StatusCode,
        header::{HeaderValue, RETRY_AFTER},
    },
    prelude::*,
};

/// Seconds a client should wait before retrying a `503`.
const RETRY_AFTER_SECONDS: &str = "1";

/// The response for a storage failure that may succeed if the request is repeated.
pub(crate) fn unavailable() -> StatusError {
    StatusError::service_unavailable().brief("Temporarily unavailable, please retry")
}

/// Stamps `Retry-After` onto every `503` produced further down the chain.
#[handler]
pub(crate) async fn retry_after(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    ctrl.call_next(req, depot, res).await;

    if res.status_code == Some(StatusCode::SERVICE_UNAVAILABLE) {
        res.headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECONDS));
    }
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use super::*;

    #[handler]
    async fn flaky() -> Result<&'static str, StatusError> {
        Err(unavailable())
    }

    #[handler]
    async fn healthy() -> &'static str {
        "ok"
    }

    fn make_service() -> Service {
        Service::new(
            Router::new()
                .hoop(retry_after)
                .push(Router::with_path("flaky").get(flaky))
                .push(Router::with_path("healthy").get(healthy)),
        )
    }

    #[tokio::test]
    async fn test_unavailable_responses_carry_retry_after() -> TestResult {
        let res = TestClient::get("http://example.com/flaky")
            .send(&make_service())
            .await;

        let retry_after_header = res
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(retry_after_header, Some("1"));

        Ok(())
    }

    #[tokio::test]
    async fn test_successful_responses_have_no_retry_after() -> TestResult {
        let res = TestClient::get("http://example.com/healthy")
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(res.headers().get(RETRY_AFTER).is_none());

        Ok(())
    }
}
