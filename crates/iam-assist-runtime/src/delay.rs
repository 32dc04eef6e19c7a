//! Typing-delay wrapper around a synchronous responder.
//!
//! The pause is presentation only: the wrapped responder is called exactly
//! as it would be without the wrapper, so the reply text never changes.

use std::time::Duration;

use async_trait::async_trait;
use iam_assist_core::{Context, Reply, Responder};
use rand::Rng;

use crate::config::TypingDelay;

/// Responder that may take time to answer.
#[async_trait]
pub trait AsyncResponder: Send + Sync {
    async fn reply(&self, message: &str, context: Option<&Context>) -> Reply;
}

impl TypingDelay {
    /// Pick a pause uniformly in `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

/// Wraps a [`Responder`] and waits a typing delay before answering.
#[derive(Debug, Clone)]
pub struct DelayedResponder<R> {
    inner: R,
    delay: TypingDelay,
}

impl<R: Responder> DelayedResponder<R> {
    pub fn new(inner: R, delay: TypingDelay) -> Self {
        Self { inner, delay }
    }

    pub fn delay(&self) -> TypingDelay {
        self.delay
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<R: Responder> AsyncResponder for DelayedResponder<R> {
    async fn reply(&self, message: &str, context: Option<&Context>) -> Reply {
        if !self.delay.is_zero() {
            let pause = self.delay.sample(&mut rand::thread_rng());
            tracing::trace!(pause = ?pause, "Simulating typing delay");
            tokio::time::sleep(pause).await;
        }
        self.inner.reply(message, context)
    }
}
