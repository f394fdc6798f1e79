//! Types for the processor module.

use serde::Serialize;

use crate::event::SubmissionEvent;
use crate::mailer::DeliveryReceipt;
use crate::storage::{ArtifactLocation, StoredObject};
use crate::templates::NotificationKind;
use crate::tracking::TrackingStatus;

/// Stages an invocation moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStage {
    Received,
    Fetching,
    DownloadFailed,
    FormatInvalid,
    Uploading,
    Notifying,
    Tracked,
}

impl ProcessingStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Fetching => "fetching",
            Self::DownloadFailed => "download_failed",
            Self::FormatInvalid => "format_invalid",
            Self::Uploading => "uploading",
            Self::Notifying => "notifying",
            Self::Tracked => "tracked",
        }
    }
}

/// Terminal result of fetching, validating and storing a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// The archive was stored and can be downloaded from `location`.
    Success {
        location: ArtifactLocation,
        stored: StoredObject,
    },
    /// The submission URL answered with something other than 200.
    DownloadFailed { status: u16 },
    /// The downloaded bytes are not a zip archive.
    FormatInvalid { file_name: String },
    /// Transport or storage fault.
    ProcessingError { reason: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Which notification the user receives for this outcome.
    pub fn notification(&self) -> NotificationKind {
        match self {
            Self::Success { .. } => NotificationKind::Success,
            Self::DownloadFailed { .. } => NotificationKind::DownloadFailed,
            Self::FormatInvalid { .. } => NotificationKind::FormatInvalid,
            Self::ProcessingError { .. } => NotificationKind::ProcessingError,
        }
    }

    /// Metric/log label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::DownloadFailed { .. } => "download_failed",
            Self::FormatInvalid { .. } => "format_invalid",
            Self::ProcessingError { .. } => "processing_error",
        }
    }
}

/// What happened to the notification email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum EmailDelivery {
    Delivered { receipt: DeliveryReceipt },
    /// The renderer failed and the plain fallback body was delivered instead.
    FallbackDelivered {
        receipt: DeliveryReceipt,
        render_error: String,
    },
    SendFailed { reason: String },
}

impl EmailDelivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Delivered { .. } => "delivered",
            Self::FallbackDelivered { .. } => "fallback_delivered",
            Self::SendFailed { .. } => "send_failed",
        }
    }
}

/// Everything one invocation did.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingReport {
    pub invocation_id: String,
    pub event: SubmissionEvent,
    pub outcome: Outcome,
    pub email: EmailDelivery,
    pub tracking_key: String,
    pub tracking_status: TrackingStatus,
    /// Set when the tracking write failed; the invocation still completes.
    pub tracking_error: Option<String>,
}
