// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for viewport subscriptions.

use thiserror::Error;

/// Conditions that keep a subscription from reaching a live registry.
///
/// None of these are fatal. The infallible facade entry points log them with
/// `tracing::warn!` and hand back an inert [`Subscription`](crate::subscribe::Subscription).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ViewportError {
    /// No authoritative provider exists anywhere above the caller.
    #[error("no viewport provider in scope for `{consumer}`; updates will not be delivered")]
    NoProvider {
        /// Name of the facade entry point that was called.
        consumer: &'static str,
    },
    /// The context refers to a provider that has already been torn down.
    #[error("the viewport provider for this context has been dropped")]
    ProviderDropped,
}
