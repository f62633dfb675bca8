//! List Payments Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    payments::{errors::into_status_error, handlers::PaymentResponse},
    state::State,
};

/// List Payments Handler
///
/// Every payment with its customer. Mounted behind the admin check.
#[endpoint(
    tags("payments"),
    summary = "List Payments",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "All payments"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<PaymentResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let payments = state
        .app
        .payments
        .list_payments()
        .await
        .map_err(into_status_error)?;

    Ok(Json(payments.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use tiffin_app::domain::payments::MockPaymentsService;

    use crate::{
        auth::middleware::require_admin,
        test_helpers::{Mocks, TEST_CUSTOMER, admin_service, customer_service, make_payment},
    };

    use super::*;

    fn route() -> Router {
        Router::with_path("getAllPayments")
            .hoop(require_admin)
            .get(handler)
    }

    #[tokio::test]
    async fn test_admin_lists_all_payments() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments.expect_list_payments().once().return_once(|| {
            Ok(vec![
                make_payment(TEST_CUSTOMER.user_uuid, 1),
                make_payment(TEST_CUSTOMER.user_uuid, 2),
            ])
        });

        let mut res = TestClient::get("http://example.com/getAllPayments")
            .send(&admin_service(
                Mocks {
                    payments,
                    ..Mocks::default()
                },
                route(),
            ))
            .await;

        let body: Vec<PaymentResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.len(), 2);
        assert_eq!(body.first().map(|p| p.user.username.as_str()), Some("alice"));

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_is_forbidden() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments.expect_list_payments().never();

        let res = TestClient::get("http://example.com/getAllPayments")
            .send(&customer_service(
                Mocks {
                    payments,
                    ..Mocks::default()
                },
                route(),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
