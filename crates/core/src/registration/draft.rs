use thiserror::Error;

use crate::api::types::RegisterReceipt;
use crate::capture::domain::capture_source::Snapshot;

/// Where a queued photo came from; the review grid badges it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhotoOrigin {
    Camera,
    File,
}

/// One JPEG queued for registration.
#[derive(Clone, Debug)]
pub struct CapturedPhoto {
    pub jpeg: Vec<u8>,
    pub origin: PhotoOrigin,
}

impl CapturedPhoto {
    pub fn from_snapshot(snapshot: Snapshot, origin: PhotoOrigin) -> Self {
        Self {
            jpeg: snapshot.jpeg,
            origin,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftStep {
    Name,
    Capture,
    Review,
    Submitting,
    Done,
}

/// Terminal state of a submission, with the text the toast shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted { message: String },
    Rejected { message: String },
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("enter a name first")]
    EmptyName,
    #[error("capture at least one photo")]
    NoPhotos,
    #[error("nothing to submit at this step")]
    WrongStep,
}

/// Everything `register_multiple` needs, detached from the draft.
#[derive(Clone, Debug)]
pub struct SubmitRequest {
    pub name: String,
    pub images: Vec<Vec<u8>>,
}

/// The registration wizard's state machine, free of GUI concerns:
/// `Name → Capture → Review → Submitting → Done`. Closing the wizard
/// drops the draft; a rejected submission keeps the photos so the user
/// can step back and retry without recapturing.
#[derive(Clone, Debug)]
pub struct RegistrationDraft {
    step: DraftStep,
    name: String,
    photos: Vec<CapturedPhoto>,
    outcome: Option<SubmitOutcome>,
}

impl RegistrationDraft {
    pub fn new() -> Self {
        Self {
            step: DraftStep::Name,
            name: String::new(),
            photos: Vec::new(),
            outcome: None,
        }
    }

    pub fn step(&self) -> DraftStep {
        self.step
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn photos(&self) -> &[CapturedPhoto] {
        &self.photos
    }

    pub fn outcome(&self) -> Option<&SubmitOutcome> {
        self.outcome.as_ref()
    }

    /// Soft hint only; one photo registers fine, two or more angles
    /// recognize better.
    pub fn wants_more_photos(&self) -> bool {
        self.photos.len() < 2
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Leave the name step. The name is trimmed here; whitespace-only
    /// input never reaches the network.
    pub fn confirm_name(&mut self) -> Result<(), DraftError> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err(DraftError::EmptyName);
        }
        self.name = trimmed.to_string();
        self.step = DraftStep::Capture;
        Ok(())
    }

    pub fn add_photo(&mut self, photo: CapturedPhoto) {
        self.photos.push(photo);
    }

    pub fn remove_photo(&mut self, index: usize) {
        if index < self.photos.len() {
            self.photos.remove(index);
        }
    }

    pub fn proceed_to_review(&mut self) -> Result<(), DraftError> {
        if self.photos.is_empty() {
            return Err(DraftError::NoPhotos);
        }
        self.step = DraftStep::Review;
        Ok(())
    }

    pub fn back_to_name(&mut self) {
        self.step = DraftStep::Name;
    }

    /// Step back for more photos. Also the retry path after a rejected
    /// submission, which is why the photo list survives.
    pub fn back_to_capture(&mut self) {
        self.step = DraftStep::Capture;
        self.outcome = None;
    }

    /// Package the submission and move to `Submitting`.
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, DraftError> {
        if self.step != DraftStep::Review {
            return Err(DraftError::WrongStep);
        }
        if self.photos.is_empty() {
            return Err(DraftError::NoPhotos);
        }
        self.step = DraftStep::Submitting;
        Ok(SubmitRequest {
            name: self.name.clone(),
            images: self.photos.iter().map(|p| p.jpeg.clone()).collect(),
        })
    }

    /// Record the backend's answer. `Err` carries the user-facing message
    /// the caller extracted from its transport error.
    pub fn finish_submit(&mut self, result: Result<RegisterReceipt, String>) {
        self.step = DraftStep::Done;
        self.outcome = Some(match result {
            Ok(receipt) if receipt.is_success() => {
                let total = receipt
                    .total_images
                    .unwrap_or(self.photos.len() as u32);
                SubmitOutcome::Accepted {
                    message: format!(
                        "Registered {} with {} photo{}",
                        self.name,
                        total,
                        if total == 1 { "" } else { "s" }
                    ),
                }
            }
            Ok(receipt) => SubmitOutcome::Rejected {
                message: non_empty_or(receipt.message, "Registration failed"),
            },
            Err(message) => SubmitOutcome::Rejected {
                message: non_empty_or(message, "Registration failed"),
            },
        });
    }
}

impl Default for RegistrationDraft {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> CapturedPhoto {
        CapturedPhoto {
            jpeg: vec![0xFF, 0xD8, 0xFF, 0xD9],
            origin: PhotoOrigin::Camera,
        }
    }

    fn receipt(status: &str, message: &str, total: Option<u32>) -> RegisterReceipt {
        RegisterReceipt {
            status: status.to_string(),
            message: message.to_string(),
            total_images: total,
        }
    }

    fn draft_at_review(name: &str, photos: usize) -> RegistrationDraft {
        let mut draft = RegistrationDraft::new();
        draft.set_name(name.to_string());
        draft.confirm_name().unwrap();
        for _ in 0..photos {
            draft.add_photo(photo());
        }
        draft.proceed_to_review().unwrap();
        draft
    }

    #[test]
    fn test_fresh_draft_starts_at_name() {
        assert_eq!(RegistrationDraft::new().step(), DraftStep::Name);
    }

    #[test]
    fn test_whitespace_only_name_is_rejected() {
        let mut draft = RegistrationDraft::new();
        draft.set_name("   \t".to_string());
        assert_eq!(draft.confirm_name(), Err(DraftError::EmptyName));
        assert_eq!(draft.step(), DraftStep::Name);
    }

    #[test]
    fn test_name_is_trimmed_on_confirm() {
        let mut draft = RegistrationDraft::new();
        draft.set_name("  Alice  ".to_string());
        draft.confirm_name().unwrap();
        assert_eq!(draft.name(), "Alice");
        assert_eq!(draft.step(), DraftStep::Capture);
    }

    #[test]
    fn test_review_requires_at_least_one_photo() {
        let mut draft = RegistrationDraft::new();
        draft.set_name("Alice".to_string());
        draft.confirm_name().unwrap();
        assert_eq!(draft.proceed_to_review(), Err(DraftError::NoPhotos));
        draft.add_photo(photo());
        assert!(draft.proceed_to_review().is_ok());
    }

    #[test]
    fn test_hint_clears_at_two_photos() {
        let mut draft = RegistrationDraft::new();
        draft.set_name("Alice".to_string());
        draft.confirm_name().unwrap();
        draft.add_photo(photo());
        assert!(draft.wants_more_photos());
        draft.add_photo(photo());
        assert!(!draft.wants_more_photos());
    }

    #[test]
    fn test_remove_photo_ignores_bad_index() {
        let mut draft = RegistrationDraft::new();
        draft.add_photo(photo());
        draft.remove_photo(5);
        assert_eq!(draft.photos().len(), 1);
        draft.remove_photo(0);
        assert!(draft.photos().is_empty());
    }

    #[test]
    fn test_submit_packages_trimmed_name_and_all_images() {
        let mut draft = draft_at_review("Bob", 2);
        let request = draft.begin_submit().unwrap();
        assert_eq!(request.name, "Bob");
        assert_eq!(request.images.len(), 2);
        assert_eq!(draft.step(), DraftStep::Submitting);
    }

    #[test]
    fn test_submit_outside_review_is_refused() {
        let mut draft = RegistrationDraft::new();
        assert_eq!(draft.begin_submit().err(), Some(DraftError::WrongStep));
    }

    #[test]
    fn test_accepted_message_carries_name_and_count() {
        let mut draft = draft_at_review("Bob", 2);
        draft.begin_submit().unwrap();
        draft.finish_submit(Ok(receipt("success", "", Some(2))));
        assert_eq!(draft.step(), DraftStep::Done);
        match draft.outcome().unwrap() {
            SubmitOutcome::Accepted { message } => {
                assert!(message.contains("Bob"));
                assert!(message.contains('2'));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_accepted_count_falls_back_to_local_photos() {
        let mut draft = draft_at_review("Alice", 3);
        draft.begin_submit().unwrap();
        draft.finish_submit(Ok(receipt("success", "", None)));
        match draft.outcome().unwrap() {
            SubmitOutcome::Accepted { message } => assert!(message.contains('3')),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_rejection_keeps_photos_for_retry() {
        let mut draft = draft_at_review("Alice", 2);
        draft.begin_submit().unwrap();
        draft.finish_submit(Ok(receipt("error", "No face detected in image", None)));

        match draft.outcome().unwrap() {
            SubmitOutcome::Rejected { message } => {
                assert_eq!(message, "No face detected in image");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(draft.photos().len(), 2);

        draft.back_to_capture();
        assert_eq!(draft.step(), DraftStep::Capture);
        assert!(draft.outcome().is_none());
        assert_eq!(draft.photos().len(), 2);
    }

    #[test]
    fn test_transport_failure_uses_generic_fallback_when_empty() {
        let mut draft = draft_at_review("Alice", 1);
        draft.begin_submit().unwrap();
        draft.finish_submit(Err("  ".to_string()));
        match draft.outcome().unwrap() {
            SubmitOutcome::Rejected { message } => assert_eq!(message, "Registration failed"),
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}
