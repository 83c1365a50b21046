// Copyright 2025 The oscloud contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Waiting for long-running operations.

use std::future::Future;
use std::time::Duration;

use log::trace;

use super::{Error, ErrorKind};

/// Wait for a condition to become true, polling at the given interval.
///
/// The predicate is called repeatedly until it returns `Ok(true)` or an error. With a timeout
/// of `None` the waiting never expires on its own.
///
/// ```rust,no_run
/// # async fn example() -> Result<(), oscloud::Error> {
/// use std::time::Duration;
///
/// let session = oscloud::Session::from_env().await?;
/// let session = &session;
/// oscloud::waiter::wait_for(
///     || async move {
///         let resp = session
///             .get(oscloud::services::COMPUTE, &["servers", "1234"])
///             .await?
///             .send_unchecked()
///             .await?;
///         Ok(resp.status().as_u16() == 404)
///     },
///     Duration::from_secs(5),
///     Some(Duration::from_secs(120)),
/// )
/// .await?;
/// # Ok(()) }
/// # #[tokio::main]
/// # async fn main() { example().await.unwrap(); }
/// ```
pub async fn wait_for<F, Fut>(
    mut predicate: F,
    interval: Duration,
    timeout: Option<Duration>,
) -> Result<(), Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, Error>>,
{
    let poll = async {
        let mut attempt = 0u64;
        loop {
            if predicate().await? {
                return Ok(());
            }
            attempt += 1;
            trace!("Condition not reached after {} attempt(s), sleeping", attempt);
            tokio::time::sleep(interval).await;
        }
    };

    match timeout {
        Some(timeout) => match tokio::time::timeout(timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(Error::new(
                ErrorKind::OperationTimedOut,
                format!("Timeout of {:?} reached while waiting", timeout),
            )),
        },
        None => poll.await,
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::super::{Error, ErrorKind};
    use super::wait_for;

    #[tokio::test]
    async fn test_immediate_success() {
        wait_for(|| async { Ok(true) }, Duration::from_secs(3600), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_several_polls() {
        let count = AtomicUsize::new(0);
        let count = &count;
        wait_for(
            || async move { Ok(count.fetch_add(1, Ordering::SeqCst) >= 2) },
            Duration::from_millis(1),
            Some(Duration::from_secs(60)),
        )
        .await
        .unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_error_propagates() {
        let err = wait_for(
            || async { Err::<bool, _>(Error::new(ErrorKind::OperationFailed, "gone wrong")) },
            Duration::from_millis(1),
            None,
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.kind(), ErrorKind::OperationFailed);
    }

    #[tokio::test]
    async fn test_timeout() {
        let err = wait_for(
            || async { Ok(false) },
            Duration::from_millis(1),
            Some(Duration::from_millis(20)),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.kind(), ErrorKind::OperationTimedOut);
    }
}
