// ABOUTME: Client onboarding status state machine
// ABOUTME: Flat adjacency table of allowed status transitions with a pure validity check
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Where a client is in the onboarding funnel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStatus {
    /// Account created from an invitation
    #[default]
    Invited,
    /// Intake questionnaire not yet submitted
    QuestionnairePending,
    /// Waiting for the first subscription payment
    PaymentPending,
    /// Paid, waiting for a coach to be assigned
    AwaitingCoach,
    /// Coached and training
    Active,
    /// Subscription paused
    Paused,
    /// Subscription cancelled (terminal)
    Cancelled,
}

use OnboardingStatus::{
    Active, AwaitingCoach, Cancelled, Invited, Paused, PaymentPending, QuestionnairePending,
};

const TRANSITIONS: &[(OnboardingStatus, &[OnboardingStatus])] = &[
    (Invited, &[QuestionnairePending, Cancelled]),
    (QuestionnairePending, &[PaymentPending, Cancelled]),
    (PaymentPending, &[AwaitingCoach, Cancelled]),
    (AwaitingCoach, &[Active, Cancelled]),
    (Active, &[Paused, Cancelled]),
    (Paused, &[Active, Cancelled]),
    (Cancelled, &[]),
];

impl OnboardingStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Invited => "invited",
            Self::QuestionnairePending => "questionnaire_pending",
            Self::PaymentPending => "payment_pending",
            Self::AwaitingCoach => "awaiting_coach",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
        }
    }

    /// Statuses reachable in one step
    #[must_use]
    pub fn allowed_transitions(self) -> &'static [Self] {
        TRANSITIONS
            .iter()
            .find(|(from, _)| *from == self)
            .map_or(&[], |(_, next)| next)
    }

    /// Whether no further transition is possible
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

/// Check whether `from -> to` is an allowed onboarding transition
#[must_use]
pub fn is_valid_transition(from: OnboardingStatus, to: OnboardingStatus) -> bool {
    from.allowed_transitions().contains(&to)
}

/// Validate and perform a transition, returning the new status
///
/// # Errors
///
/// Returns `InvalidInput` if the transition is not allowed
pub fn transition(from: OnboardingStatus, to: OnboardingStatus) -> AppResult<OnboardingStatus> {
    if is_valid_transition(from, to) {
        Ok(to)
    } else {
        Err(AppError::invalid_input(format!(
            "Cannot move onboarding status from {from} to {to}"
        )))
    }
}

impl FromStr for OnboardingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TRANSITIONS
            .iter()
            .map(|(status, _)| *status)
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::invalid_input(format!("Unknown onboarding status: {s}")))
    }
}

impl fmt::Display for OnboardingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
