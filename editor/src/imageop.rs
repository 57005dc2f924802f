//! Generative image operations.
//!
//! DESIGN
//! ======
//! The generative service is an external collaborator reached through the
//! async [`ImageOpClient`] seam. Network timing never reaches the session:
//! the host builds an [`ImageOpRequest`] from the session, awaits
//! [`run_image_op`] outside it, then hands the [`ImageOpOutcome`] back to
//! `EditorSession::apply_image_op`. A failed call therefore leaves scene and
//! history untouched.
//!
//! [`ImageOpGate`] is the caller-side busy flag: a second operation started
//! while one is in flight is rejected instead of queued or cancelled.

#[cfg(test)]
#[path = "imageop_test.rs"]
mod imageop_test;

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::doc::ObjectId;
use crate::error::{EditorError, ErrorCode};

/// Errors reported by an [`ImageOpClient`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum ImageOpError {
    /// The request never produced a response.
    #[error("image request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("image service returned status {status}")]
    Status { status: u16 },

    /// The response could not be decoded.
    #[error("image response parse failed: {0}")]
    Parse(String),
}

impl ErrorCode for ImageOpError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_IMAGE_REQUEST",
            Self::Status { .. } => "E_IMAGE_STATUS",
            Self::Parse(_) => "E_IMAGE_PARSE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599 })
    }
}

/// Hosted generative-image service: one image plus an instruction in, zero
/// or more images out.
#[async_trait::async_trait]
pub trait ImageOpClient: Send + Sync {
    async fn request_image_op(&self, image: &[u8], instruction: &str) -> Result<Vec<Vec<u8>>, ImageOpError>;
}

/// The two generative operations the editor offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageOp {
    /// Cut the subject of the selected image out of its background.
    RemoveBackground,
    /// Rework the whole canvas; an empty canvas gets a generated background.
    Enhance,
}

impl ImageOp {
    /// Instruction text sent with the image.
    #[must_use]
    pub fn instruction(self) -> &'static str {
        match self {
            Self::RemoveBackground => {
                "Remove the background from this image. Return ONLY the subject with a transparent background. \
                 If transparency is not possible, return the subject on a pure white background."
            }
            Self::Enhance => {
                "Enhance this image or add creative elements. If it is empty, generate a beautiful artistic background."
            }
        }
    }
}

/// Everything needed to run an operation without touching the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOpRequest {
    pub op: ImageOp,
    /// Image object the result replaces; `None` for whole-canvas operations.
    pub target: Option<ObjectId>,
    /// Encoded input image.
    pub image: Vec<u8>,
}

/// A successful operation, ready to be applied to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOpOutcome {
    pub op: ImageOp,
    pub target: Option<ObjectId>,
    /// Encoded result image.
    pub image: Vec<u8>,
}

/// Caller-side single-flight gate for image operations.
#[derive(Debug, Default)]
pub struct ImageOpGate {
    busy: AtomicBool,
}

/// Holds the gate closed until dropped.
#[derive(Debug)]
pub struct GateGuard<'a> {
    gate: &'a ImageOpGate,
}

impl ImageOpGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the gate, or return `None` if an operation is already running.
    #[must_use]
    pub fn try_begin(&self) -> Option<GateGuard<'_>> {
        let acquired = self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        acquired.then_some(GateGuard { gate: self })
    }
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

/// Run `request` against `client` behind `gate`.
///
/// The first non-empty payload wins.
///
/// # Errors
///
/// `Busy` if another operation holds the gate; `ExternalOpFailed` if the
/// client fails or returns no usable image.
pub async fn run_image_op(
    client: &dyn ImageOpClient,
    gate: &ImageOpGate,
    request: ImageOpRequest,
) -> Result<ImageOpOutcome, EditorError> {
    let Some(_guard) = gate.try_begin() else {
        warn!(op = ?request.op, "imageop: rejected, another operation is in flight");
        return Err(EditorError::Busy);
    };
    info!(op = ?request.op, input_len = request.image.len(), "imageop: request sent");

    let payloads = match client.request_image_op(&request.image, request.op.instruction()).await {
        Ok(payloads) => payloads,
        Err(e) => {
            warn!(op = ?request.op, error = %e, code = e.error_code(), "imageop: request failed");
            return Err(EditorError::ExternalOpFailed(e.to_string()));
        }
    };

    let Some(image) = payloads.into_iter().find(|p| !p.is_empty()) else {
        warn!(op = ?request.op, "imageop: response had no image");
        return Err(EditorError::ExternalOpFailed("response contained no image".into()));
    };
    info!(op = ?request.op, output_len = image.len(), "imageop: result received");
    Ok(ImageOpOutcome { op: request.op, target: request.target, image })
}
