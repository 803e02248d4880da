/// Common test utilities and fixtures for integration tests
use redis::{Client as RedisClient, Commands};
use serde_json::Value;

/// Test fixtures and helper functions
pub struct TestContext {
    pub base_url: String,
    pub redis_client: RedisClient,
}

impl TestContext {
    /// Create a new test context (the rewards backend must be running separately)
    pub async fn new() -> Self {
        // Use separate Redis database for tests (db 1 instead of 0)
        let redis_url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://127.0.0.1:6379/1".to_string());

        let redis_client =
            RedisClient::open(redis_url.clone()).expect("Failed to create Redis client");

        // Flush test database before each test
        let mut conn = redis_client
            .get_connection()
            .expect("Failed to connect to Redis");
        let _: () = redis::cmd("FLUSHDB").query(&mut conn).expect("Failed to flush Redis");

        let base_url = std::env::var("REWARDS_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        Self {
            base_url,
            redis_client,
        }
    }

    /// Clean up test data after test
    pub fn cleanup(&self) {
        let mut conn = self
            .redis_client
            .get_connection()
            .expect("Failed to connect to Redis");
        let _: () = redis::cmd("FLUSHDB").query(&mut conn).expect("Failed to flush Redis");
    }

    /// Seed a promocode directly in Redis
    pub fn seed_promocode(&self, code: &str, amount_minor: i64, max_uses: i64) {
        let mut conn = self
            .redis_client
            .get_connection()
            .expect("Failed to connect to Redis");

        let code = code.to_uppercase();
        let key = format!("promo:{}", code);
        let _: () = conn
            .hset_multiple(
                &key,
                &[
                    ("code", code.clone()),
                    ("amount", amount_minor.to_string()),
                    ("max_uses", max_uses.to_string()),
                    ("uses", "0".to_string()),
                    ("created_at_ms", chrono::Utc::now().timestamp_millis().to_string()),
                ],
            )
            .expect("Failed to seed promocode");
        let _: () = conn
            .sadd("promo:index", code)
            .expect("Failed to index promocode");
    }

    /// Read a user's balance in minor units
    pub fn balance_of(&self, user_id: i64) -> i64 {
        let mut conn = self
            .redis_client
            .get_connection()
            .expect("Failed to connect to Redis");
        let balance: Option<i64> = conn
            .hget(format!("user:{}", user_id), "balance")
            .expect("Failed to read balance");
        balance.unwrap_or(0)
    }

    /// Read a promocode's use count
    pub fn uses_of(&self, code: &str) -> i64 {
        let mut conn = self
            .redis_client
            .get_connection()
            .expect("Failed to connect to Redis");
        let uses: Option<i64> = conn
            .hget(format!("promo:{}", code.to_uppercase()), "uses")
            .expect("Failed to read uses");
        uses.unwrap_or(0)
    }

    /// Pin a user's cooldown anchor to a specific timestamp
    pub fn set_last_spin_ms(&self, user_id: i64, ms: i64) {
        let mut conn = self
            .redis_client
            .get_connection()
            .expect("Failed to connect to Redis");
        let _: () = conn
            .set(format!("wheel:last:{}", user_id), ms)
            .expect("Failed to set cooldown anchor");
    }

    /// Count spin records for a user
    pub fn spin_count(&self, user_id: i64) -> i64 {
        let mut conn = self
            .redis_client
            .get_connection()
            .expect("Failed to connect to Redis");
        let count: i64 = conn
            .zcard(format!("spins:user:{}", user_id))
            .expect("Failed to count spins");
        count
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Helper function to parse error response
pub fn parse_error(body: &str) -> Option<(String, String, String)> {
    let json: Value = serde_json::from_str(body).ok()?;
    let error = json.get("error")?;

    Some((
        error.get("code")?.as_str()?.to_string(),
        error.get("message")?.as_str()?.to_string(),
        error.get("category")?.as_str()?.to_string(),
    ))
}

/// Helper function to create test HTTP client
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("Failed to create HTTP client")
}
