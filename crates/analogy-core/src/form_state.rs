//! State of one analogy form and its transitions.
//!
//! Every operation on the form is a plain method on [`FormState`]; none of
//! them perform I/O. The controller pairs a `begin_*` call with the matching
//! `apply_*` call once the service has answered.

use crate::error::{AnalogyError, Result};
use crate::types::{
    AnalogyResult, FeedbackMessage, FeedbackRatings, FeedbackReceipt, FeedbackSubmission,
    RatingDimension, Stars,
};
use serde::Serialize;
use std::fmt;

/// Shown when the feedback request fails.
pub const FEEDBACK_ERROR_MESSAGE: &str = "Error submitting feedback.";

/// Prefix of the message shown when generation fails.
pub const GENERATE_ERROR_MESSAGE: &str = "Error generating analogy";

/// Identifies one generation request. Tokens only ever increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse phase of the form, derived from its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Generating,
    Failed,
    ShowingResult,
    Submitted,
}

/// A feedback submission that has been composed but not yet answered.
#[derive(Debug, Clone)]
pub struct PendingFeedback {
    pub submission: FeedbackSubmission,
    result_request: Option<RequestToken>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FormState {
    question: String,
    result: Option<AnalogyResult>,
    loading: bool,
    feedback: FeedbackRatings,
    feedback_message: Option<FeedbackMessage>,
    submitted: bool,
    generate_error: Option<String>,
    feedback_pending: bool,
    #[serde(skip)]
    issued: u64,
    #[serde(skip)]
    latest_request: Option<RequestToken>,
    #[serde(skip)]
    result_request: Option<RequestToken>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn result(&self) -> Option<&AnalogyResult> {
        self.result.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn feedback(&self) -> &FeedbackRatings {
        &self.feedback
    }

    pub fn feedback_message(&self) -> Option<&FeedbackMessage> {
        self.feedback_message.as_ref()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn generate_error(&self) -> Option<&str> {
        self.generate_error.as_deref()
    }

    pub fn is_feedback_pending(&self) -> bool {
        self.feedback_pending
    }

    pub fn latest_request(&self) -> Option<RequestToken> {
        self.latest_request
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Generating
        } else if self.result.is_some() {
            if self.submitted {
                Phase::Submitted
            } else {
                Phase::ShowingResult
            }
        } else if self.generate_error.is_some() {
            Phase::Failed
        } else {
            Phase::Idle
        }
    }

    /// Start a generation request for `question` and return its token.
    ///
    /// Clears the previous result, messages and the submitted flag. Ratings
    /// typed so far are kept.
    pub fn begin_generate(&mut self, question: &str) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);

        self.question = question.to_string();
        self.loading = true;
        self.result = None;
        self.result_request = None;
        self.feedback_message = None;
        self.generate_error = None;
        self.submitted = false;
        self.latest_request = Some(token);

        token
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest_request == Some(token)
    }

    /// Apply the service's answer to request `token`.
    ///
    /// Answers to anything but the latest request leave the state untouched
    /// and come back as [`AnalogyError::Superseded`].
    pub fn apply_generate_outcome(
        &mut self,
        token: RequestToken,
        outcome: Result<AnalogyResult>,
    ) -> Result<AnalogyResult> {
        if !self.is_current(token) {
            return Err(AnalogyError::Superseded);
        }

        self.loading = false;
        match outcome {
            Ok(result) => {
                self.result = Some(result.clone());
                self.result_request = Some(token);
                Ok(result)
            }
            Err(e) => {
                self.generate_error = Some(format!("{}: {}", GENERATE_ERROR_MESSAGE, e));
                Err(e)
            }
        }
    }

    /// Drop the loading flag of a request that will never be answered.
    pub fn release_generate(&mut self, token: RequestToken) {
        if self.is_current(token) {
            self.loading = false;
        }
    }

    pub fn rate(&mut self, dimension: RatingDimension, stars: Stars) {
        self.feedback.set(dimension, stars);
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.feedback.comment = comment.into();
    }

    /// Compose the feedback payload for the held result.
    ///
    /// Returns `None`, leaving the state unchanged, when no result is held.
    pub fn begin_feedback(&mut self) -> Option<PendingFeedback> {
        let result = self.result.as_ref()?;
        let submission = FeedbackSubmission::compose(result, &self.feedback);
        self.feedback_pending = true;

        Some(PendingFeedback {
            submission,
            result_request: self.result_request,
        })
    }

    /// Apply the service's answer to a feedback submission.
    ///
    /// If the result the feedback described has since been replaced, the
    /// answer is discarded and [`AnalogyError::Superseded`] is returned.
    pub fn apply_feedback_outcome(
        &mut self,
        pending: &PendingFeedback,
        outcome: Result<FeedbackReceipt>,
    ) -> Result<FeedbackReceipt> {
        self.feedback_pending = false;

        if self.result.is_none() || self.result_request != pending.result_request {
            return Err(AnalogyError::Superseded);
        }

        match outcome {
            Ok(receipt) => {
                self.feedback_message = Some(FeedbackMessage::Confirmation(receipt.message.clone()));
                self.feedback.reset();
                self.submitted = true;
                Ok(receipt)
            }
            Err(e) => {
                self.feedback_message =
                    Some(FeedbackMessage::Error(FEEDBACK_ERROR_MESSAGE.to_string()));
                Err(e)
            }
        }
    }

    pub fn release_feedback(&mut self) {
        self.feedback_pending = false;
    }
}
