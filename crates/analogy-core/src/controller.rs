use crate::error::{AnalogyError, Result};
use crate::form_state::{FormState, Phase, RequestToken};
use crate::traits::AnalogyService;
use crate::types::{AnalogyResult, FeedbackReceipt, RatingDimension, Stars};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives one analogy form against an [`AnalogyService`].
///
/// All methods take `&self`, so a controller shared behind an `Arc` can have
/// several requests outstanding. The state lock is never held across an
/// `.await`.
pub struct AnalogyFormController {
    service: Arc<dyn AnalogyService>,
    state: Mutex<FormState>,
}

impl AnalogyFormController {
    pub fn new(service: Arc<dyn AnalogyService>) -> Self {
        Self {
            service,
            state: Mutex::new(FormState::new()),
        }
    }

    pub fn service(&self) -> &Arc<dyn AnalogyService> {
        &self.service
    }

    /// Copy of the current state for rendering
    pub fn snapshot(&self) -> FormState {
        self.state.lock().clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().phase()
    }

    /// Request an analogy for `question`.
    ///
    /// The loading flag is released on every exit path, including when the
    /// returned future is dropped before the service answers. If a newer
    /// request was started in the meantime this one returns
    /// [`AnalogyError::Superseded`] and leaves the form alone.
    pub async fn generate(&self, question: &str) -> Result<AnalogyResult> {
        let token = self.state.lock().begin_generate(question);
        let guard = InFlight::generate(&self.state, token);
        debug!(
            "Generating analogy {} via {} (question: {:?})",
            token,
            self.service.endpoint(),
            question
        );

        let outcome = self.service.generate_analogy(question).await;
        if let Err(e) = &outcome {
            warn!("Analogy generation {} failed: {}", token, e);
        }

        let applied = guard.settle(|state| state.apply_generate_outcome(token, outcome));
        match &applied {
            Ok(_) => info!("Analogy {} received", token),
            Err(AnalogyError::Superseded) => {
                debug!("Discarding response to {}: a newer request is current", token)
            }
            Err(_) => {}
        }
        applied
    }

    pub fn rate(&self, dimension: RatingDimension, value: u8) -> Result<()> {
        let stars = Stars::new(value)?;
        self.state.lock().rate(dimension, stars);
        Ok(())
    }

    pub fn set_comment(&self, comment: impl Into<String>) {
        self.state.lock().set_comment(comment);
    }

    /// Post the current ratings about the held analogy.
    ///
    /// Returns `Ok(None)` without contacting the service when no analogy is
    /// held.
    pub async fn submit_feedback(&self) -> Result<Option<FeedbackReceipt>> {
        let Some(pending) = self.state.lock().begin_feedback() else {
            debug!("No analogy held, skipping feedback submission");
            return Ok(None);
        };
        let guard = InFlight::feedback(&self.state);

        let outcome = self.service.submit_feedback(&pending.submission).await;
        if let Err(e) = &outcome {
            warn!("Feedback submission failed: {}", e);
        }

        guard
            .settle(|state| state.apply_feedback_outcome(&pending, outcome))
            .map(Some)
    }
}

enum Pending {
    Generate(RequestToken),
    Feedback,
}

/// Releases the form's pending flag if the request never settles.
struct InFlight<'a> {
    state: &'a Mutex<FormState>,
    pending: Pending,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn generate(state: &'a Mutex<FormState>, token: RequestToken) -> Self {
        Self {
            state,
            pending: Pending::Generate(token),
            settled: false,
        }
    }

    fn feedback(state: &'a Mutex<FormState>) -> Self {
        Self {
            state,
            pending: Pending::Feedback,
            settled: false,
        }
    }

    fn settle<T>(mut self, apply: impl FnOnce(&mut FormState) -> T) -> T {
        self.settled = true;
        let mut state = self.state.lock();
        apply(&mut *state)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.state.lock();
        match self.pending {
            Pending::Generate(token) => {
                debug!("Generation {} dropped before completion", token);
                state.release_generate(token);
            }
            Pending::Feedback => state.release_feedback(),
        }
    }
}
