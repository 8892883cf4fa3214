// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A caching [TokenProvider] decorator.

use crate::Result;
use crate::errors::CredentialsError;
use crate::token::{Token, TokenProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard, Notify};
// Using tokio's wrapper makes the cache testable without relying on clock times.
use tokio::time::Instant;

/// Tokens are refreshed this long before they expire.
pub const REFRESH_SLACK: Duration = Duration::from_secs(10);

/// Caches the token returned by an inner [TokenProvider].
///
/// The cached token is returned until it is within [REFRESH_SLACK] of its
/// expiration. Only one refresh runs at a time: callers arriving while a
/// refresh is in progress wait for its result, and share it, whether it is a
/// token or an error. Errors are not cached beyond that refresh, the next
/// caller starts a new one.
///
/// Tokens without an expiration are cached forever.
#[derive(Debug)]
pub struct TokenCache<T>
where
    T: TokenProvider,
{
    // The cached token, or the last seen error.
    token: Arc<Mutex<Result<Token>>>,

    // Tracks if a refresh is ongoing. If the lock is held, there is a refresh.
    refresh_in_progress: Arc<Mutex<()>>,
    // Allows us to await the result of a refresh in multiple tasks.
    refresh_notify: Arc<Notify>,

    inner: Arc<T>,
}

// Returns true if we are holding an error, or a token that is about to expire.
fn invalid(token: &Result<Token>) -> bool {
    match token {
        Ok(t) => t
            .expires_at
            .is_some_and(|e| e <= Instant::now() + REFRESH_SLACK),
        Err(_) => true,
    }
}

// Implemented by hand, the derived version requires `T: Clone`.
impl<T: TokenProvider> Clone for TokenCache<T> {
    fn clone(&self) -> TokenCache<T> {
        TokenCache {
            token: self.token.clone(),
            refresh_in_progress: self.refresh_in_progress.clone(),
            refresh_notify: self.refresh_notify.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<T: TokenProvider> TokenCache<T> {
    pub fn new(inner: T) -> TokenCache<T> {
        TokenCache {
            token: Arc::new(Mutex::new(Err(CredentialsError::from_msg(
                true,
                "no token in the cache",
            )))),
            refresh_in_progress: Arc::new(Mutex::new(())),
            refresh_notify: Arc::new(Notify::new()),
            inner: Arc::new(inner),
        }
    }

    /// Returns `true` if the cache holds no usable token and no refresh is
    /// running.
    ///
    /// Owners of many caches use this to drop the ones nobody is using. A
    /// cache that is busy is never reported as stale.
    pub fn is_stale(&self) -> bool {
        let Ok(_refresh) = self.refresh_in_progress.try_lock() else {
            return false;
        };
        match self.token.try_lock() {
            Ok(token) => invalid(&token),
            Err(_) => false,
        }
    }

    // Clones the current token, releasing the lock on return.
    async fn current_token(&self) -> Result<Token> {
        self.token.lock().await.clone()
    }
}

struct RefreshGuard<'a> {
    _lock: MutexGuard<'a, ()>,
    notify: &'a Notify,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.notify.notify_waiters();
    }
}

#[async_trait::async_trait]
impl<T: TokenProvider + 'static> TokenProvider for TokenCache<T> {
    async fn token(&self) -> Result<Token> {
        let token = self.current_token().await;
        if !invalid(&token) {
            return token;
        }

        // Register interest before checking for a refresh, otherwise a
        // refresh completing between the check and the wait is lost.
        let mut notified = std::pin::pin!(self.refresh_notify.notified());
        notified.as_mut().enable();

        match self.refresh_in_progress.try_lock() {
            Ok(lock) => {
                // Waiters are released even if this future is dropped mid-refresh.
                let _guard = RefreshGuard {
                    _lock: lock,
                    notify: &self.refresh_notify,
                };
                tracing::debug!("refreshing access token");
                let token = self.inner.token().await;
                *self.token.lock().await = token.clone();
                return token;
            }
            Err(_) => {
                notified.await;
            }
        }

        self.current_token().await
    }
}
