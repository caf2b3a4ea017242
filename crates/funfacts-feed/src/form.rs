//! State of the "share a fact" form.

use funfacts_store::RemoteStore;

use crate::validation::{Candidate, MAX_TEXT_LEN, text_len, validate};
use crate::{FactFeed, FeedError, SubmitOutcome};

/// Input fields plus visibility of the submission form.
///
/// Once a candidate passes validation and its request settles, whether it
/// succeeded or not, the fields are cleared and the form is hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactForm {
    pub text: String,
    pub source: String,
    pub category: String,
    visible: bool,
    uploading: bool,
}

impl FactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// True while a post is in flight; inputs should be disabled.
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Open a closed form or close an open one.
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Characters left before the text limit. Negative once over it.
    pub fn remaining_chars(&self) -> i64 {
        MAX_TEXT_LEN as i64 - text_len(&self.text) as i64
    }

    pub fn candidate(&self) -> Candidate {
        Candidate::new(&self.text, &self.source, &self.category)
    }

    /// Start a post: returns the candidate to submit if it is valid, marking
    /// the form as uploading. An invalid form is left untouched.
    pub fn begin_post(&mut self) -> Option<Candidate> {
        let candidate = self.candidate();
        validate(&candidate).ok()?;
        self.uploading = true;
        Some(candidate)
    }

    /// Settle a post started with [`begin_post`](Self::begin_post).
    pub fn finish_post(&mut self) {
        self.uploading = false;
        self.text.clear();
        self.source.clear();
        self.category.clear();
        self.visible = false;
    }

    /// Submit the form's contents to the feed.
    ///
    /// A candidate that fails validation is returned as rejected and the
    /// form keeps its contents. Otherwise the form is reset and hidden after
    /// the request settles, and the feed's result is passed through.
    pub async fn post<S: RemoteStore>(
        &mut self,
        feed: &FactFeed<S>,
    ) -> Result<SubmitOutcome, FeedError> {
        let candidate = self.candidate();
        if let Err(reason) = validate(&candidate) {
            return Ok(SubmitOutcome::Rejected(reason));
        }

        self.uploading = true;
        let result = feed.submit(&candidate).await;
        self.finish_post();
        result
    }
}
