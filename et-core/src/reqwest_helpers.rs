use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use http::Extensions;
use log::{debug, error};
use reqwest::{Client, Request, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware, Next};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

const USER_AGENT: &str = concat!("et-cli/", env!("CARGO_PKG_VERSION"));

pub fn create_client(requests_per_second: u32) -> anyhow::Result<ClientWithMiddleware> {
    let reqwest_client = Client::builder().user_agent(USER_AGENT).build()?;

    let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
    let limiter = RateLimiter::direct(Quota::per_second(per_second));
    let rate_limiting_middleware = RateLimitingMiddleware { limiter: Arc::new(limiter) };

    let retry_policy = ExponentialBackoff::builder()
        .retry_bounds(Duration::from_millis(50), Duration::from_secs(30))
        .build_with_max_retries(5);

    Ok(ClientBuilder::new(reqwest_client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .with(ErrorLoggingMiddleware)
        .with(rate_limiting_middleware)
        .build())
}

struct RateLimitingMiddleware {
    limiter: Arc<DefaultDirectRateLimiter>,
}

#[async_trait::async_trait]
impl Middleware for RateLimitingMiddleware {
    async fn handle(&self, req: Request, extensions: &mut Extensions, next: Next<'_>) -> reqwest_middleware::Result<Response> {
        self.limiter.until_ready().await;
        next.run(req, extensions).await
    }
}

pub struct ErrorLoggingMiddleware;

#[async_trait::async_trait]
impl Middleware for ErrorLoggingMiddleware {
    async fn handle(&self, req: Request, extensions: &mut Extensions, next: Next<'_>) -> reqwest_middleware::Result<Response> {
        let start = Instant::now();
        let method = req.method().clone();
        let url = req.url().clone();

        let result = next.run(req, extensions).await;

        let duration = start.elapsed();

        match &result {
            Ok(resp) if !resp.status().is_success() => {
                let status = resp.status();

                match status.as_u16() {
                    // ESI answers pages past the end with 404
                    404 => debug!("Request returned no data {} {} - Status: {}, Duration: {:?}", method, url, status, duration),
                    420 | 429 => debug!("Request failed due to rate-limit {} {} - Status: {}, Duration: {:?}", method, url, status, duration),
                    _ => error!("Request failed: {} {} - Status: {}, Duration: {:?}", method, url, status, duration),
                }
            }
            Err(e) => {
                error!("Request error: {} {} - Error: {}, Duration: {:?}", method, url, e, duration);
            }
            _ => {
                debug!("Request succeeded: {} {} - Duration: {:?}", method, url, duration);
            }
        }

        result
    }
}
