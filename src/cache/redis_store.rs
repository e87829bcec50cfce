use async_trait::async_trait;
use parking_lot::Mutex;
use redis::aio::MultiplexedConnection;
use redis::{Client, FromRedisValue};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::cache::{CacheError, CacheResult, CacheStore};

/// Redis-backed cache store.
///
/// The connection is opened lazily on first use and shared afterwards.
/// Connects and commands are bounded by short timeouts and never retried
/// automatically: a failed connect is attempted again on the next call, so
/// an unreachable Redis costs at most one connect timeout per request.
pub struct RedisCacheStore {
    client: Client,
    connection: Mutex<Option<MultiplexedConnection>>,
    connect_timeout: Duration,
    command_timeout: Duration,
    outage_logged: AtomicBool,
}

impl RedisCacheStore {
    /// Create a store for `redis_url`. No connection is made yet.
    pub fn new(
        redis_url: &str,
        connect_timeout: Duration,
        command_timeout: Duration,
    ) -> CacheResult<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            CacheError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        Ok(Self {
            client,
            connection: Mutex::new(None),
            connect_timeout,
            command_timeout,
            outage_logged: AtomicBool::new(false),
        })
    }

    /// Shared connection, connecting on first use
    async fn connection(&self) -> CacheResult<MultiplexedConnection> {
        let existing = self.connection.lock().clone();
        if let Some(conn) = existing {
            return Ok(conn);
        }

        let conn = tokio::time::timeout(
            self.connect_timeout,
            self.client.get_multiplexed_tokio_connection(),
        )
        .await
        .map_err(|_| CacheError::Timeout(self.connect_timeout.as_millis() as u64))?
        .map_err(|e| CacheError::Connection(e.to_string()))?;

        if self.outage_logged.swap(false, Ordering::Relaxed) {
            tracing::info!("Redis connection restored");
        } else {
            tracing::debug!("Redis connection established");
        }

        *self.connection.lock() = Some(conn.clone());
        Ok(conn)
    }

    fn drop_connection(&self) {
        self.connection.lock().take();
    }

    /// Log the first failure of an outage loudly, the rest quietly
    fn note_failure(&self, err: &CacheError) {
        if !self.outage_logged.swap(true, Ordering::Relaxed) {
            tracing::warn!(error = %err, "Redis unavailable; continuing without cache");
        } else {
            tracing::debug!(error = %err, "Redis still unavailable");
        }
    }

    async fn query<T: FromRedisValue>(&self, cmd: redis::Cmd) -> CacheResult<T> {
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                self.note_failure(&e);
                return Err(e);
            }
        };

        let result = tokio::time::timeout(self.command_timeout, cmd.query_async::<_, T>(&mut conn))
            .await;

        match result {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() {
                    self.drop_connection();
                    let err = CacheError::Connection(e.to_string());
                    self.note_failure(&err);
                    Err(err)
                } else {
                    Err(CacheError::Command(e.to_string()))
                }
            }
            Err(_) => {
                self.drop_connection();
                let err = CacheError::Timeout(self.command_timeout.as_millis() as u64);
                self.note_failure(&err);
                Err(err)
            }
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(key);
        self.query(cmd).await
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("EX").arg(ttl.as_secs().max(1));
        self.query(cmd).await
    }

    async fn ping(&self) -> CacheResult<()> {
        let pong: String = self.query(redis::cmd("PING")).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(CacheError::Command(format!("unexpected PING reply: {}", pong)))
        }
    }
}
