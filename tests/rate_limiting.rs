//! Rate limiting integration tests.
//!
//! Policies are reconfigured to second-scale windows so window expiry
//! is testable; the policy logic itself does not change with size.

use std::time::Duration;

use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn fourth_submission_in_window_is_rejected() {
    let mock = common::start_mock_messaging(200).await;
    let mut config = common::test_config(&mock.api_base);
    config.rate_limit.enabled = true;
    config.rate_limit.submission.window_secs = 60;
    config.rate_limit.submission.max_requests = 3;
    config.rate_limit.general.window_secs = 60;
    config.rate_limit.general.max_requests = 100;
    let gateway = common::start_gateway(config).await;
    let client = common::test_client();

    let url = format!("{}/api/submit-application", gateway.base_url);
    for _ in 0..3 {
        let response = client
            .post(&url)
            .json(&common::valid_application())
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    let rejected = client
        .post(&url)
        .json(&common::valid_application())
        .send()
        .await
        .unwrap();

    assert_eq!(rejected.status(), 429);
    assert_eq!(rejected.headers()["ratelimit-limit"], "3");
    assert_eq!(rejected.headers()["ratelimit-remaining"], "0");
    assert!(rejected.headers().contains_key("retry-after"));
    let body: Value = rejected.json().await.unwrap();
    assert_eq!(body["success"], false);

    // The rejected request never reached the notifier.
    assert_eq!(mock.captured().len(), 3);

    gateway.stop();
}

#[tokio::test]
async fn window_expiry_readmits_the_client() {
    let mock = common::start_mock_messaging(200).await;
    let mut config = common::test_config(&mock.api_base);
    config.rate_limit.enabled = true;
    config.rate_limit.submission.window_secs = 1;
    config.rate_limit.submission.max_requests = 1;
    config.rate_limit.general.window_secs = 1;
    config.rate_limit.general.max_requests = 100;
    let gateway = common::start_gateway(config).await;
    let client = common::test_client();

    let url = format!("{}/api/submit-application", gateway.base_url);
    let first = client
        .post(&url)
        .json(&common::valid_application())
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 200);

    let second = client
        .post(&url)
        .json(&common::valid_application())
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 429);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let third = client
        .post(&url)
        .json(&common::valid_application())
        .send()
        .await
        .unwrap();
    assert_eq!(third.status(), 200);

    gateway.stop();
}

#[tokio::test]
async fn general_policy_spans_all_api_routes() {
    let mock = common::start_mock_messaging(200).await;
    let mut config = common::test_config(&mock.api_base);
    config.rate_limit.enabled = true;
    config.rate_limit.general.window_secs = 60;
    config.rate_limit.general.max_requests = 2;
    config.rate_limit.submission.window_secs = 60;
    config.rate_limit.submission.max_requests = 100;
    let gateway = common::start_gateway(config).await;
    let client = common::test_client();

    let callback = client
        .post(format!("{}/api/request-callback", gateway.base_url))
        .json(&json!({ "phone": "+79991234567" }))
        .send()
        .await
        .unwrap();
    assert_eq!(callback.status(), 200);

    let wimax = client
        .post(format!("{}/api/request-wimax", gateway.base_url))
        .json(&json!({ "name": "Иван Иванов", "phone": "+79991234567" }))
        .send()
        .await
        .unwrap();
    assert_eq!(wimax.status(), 200);

    // Third request anywhere under /api trips the shared policy.
    let rejected = client
        .post(format!("{}/api/request-ngn-callback", gateway.base_url))
        .json(&json!({ "phone": "+79991234567", "selectedTariff": "NGN" }))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), 429);

    gateway.stop();
}

#[tokio::test]
async fn rejection_happens_before_validation() {
    let mock = common::start_mock_messaging(200).await;
    let mut config = common::test_config(&mock.api_base);
    config.rate_limit.enabled = true;
    config.rate_limit.general.window_secs = 60;
    config.rate_limit.general.max_requests = 1;
    let gateway = common::start_gateway(config).await;
    let client = common::test_client();

    let url = format!("{}/api/request-callback", gateway.base_url);
    let first = client
        .post(&url)
        .json(&json!({ "phone": "+79991234567" }))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 200);

    // Invalid body, but the limiter answers first: 429, not 400.
    let second = client.post(&url).json(&json!({})).send().await.unwrap();
    assert_eq!(second.status(), 429);

    gateway.stop();
}

#[tokio::test]
async fn health_probe_is_exempt_from_rate_limits() {
    let mock = common::start_mock_messaging(200).await;
    let mut config = common::test_config(&mock.api_base);
    config.rate_limit.enabled = true;
    config.rate_limit.general.window_secs = 60;
    config.rate_limit.general.max_requests = 1;
    let gateway = common::start_gateway(config).await;
    let client = common::test_client();

    for _ in 0..5 {
        let response = client
            .get(format!("{}/health", gateway.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    gateway.stop();
}

#[tokio::test]
async fn allowed_responses_expose_quota_headers() {
    let mock = common::start_mock_messaging(200).await;
    let mut config = common::test_config(&mock.api_base);
    config.rate_limit.enabled = true;
    config.rate_limit.general.window_secs = 60;
    config.rate_limit.general.max_requests = 5;
    let gateway = common::start_gateway(config).await;
    let client = common::test_client();

    let response = client
        .post(format!("{}/api/request-callback", gateway.base_url))
        .json(&json!({ "phone": "+79991234567" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["ratelimit-limit"], "5");
    assert_eq!(response.headers()["ratelimit-remaining"], "4");
    assert!(response.headers().contains_key("ratelimit-reset"));

    gateway.stop();
}
