use reqwest::Url;
use serde::Serialize;

use crate::event::SubmissionEvent;

/// Name used when the submission URL has no usable last segment.
pub const FALLBACK_FILE_NAME: &str = "submission.zip";

/// Where an accepted artifact lives and how the user downloads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactLocation {
    /// `{first}_{last}/{assignment_id}/attempt_{count}/{file_name}`
    pub object_path: String,
    /// `{public_base_url}/{bucket}/{object_path}` with each path segment
    /// percent-encoded.
    pub public_url: String,
}

impl ArtifactLocation {
    pub fn new(
        event: &SubmissionEvent,
        file_name: &str,
        bucket: &str,
        public_base_url: &str,
    ) -> Self {
        let object_path = format!(
            "{}_{}/{}/attempt_{}/{}",
            path_component(&event.user_first_name),
            path_component(&event.user_last_name),
            path_component(&event.assignment_id),
            event.submission_count,
            path_component(file_name),
        );
        let encoded: Vec<String> = object_path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        let public_url = format!(
            "{}/{}/{}",
            public_base_url.trim_end_matches('/'),
            urlencoding::encode(bucket),
            encoded.join("/")
        );
        Self {
            object_path,
            public_url,
        }
    }
}

/// Last path segment of the submission URL, percent-decoded.
///
/// Query string and fragment are ignored.
pub fn file_name_from_url(url: &str) -> String {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .map(str::to_string),
    };

    segment
        .map(|s| {
            urlencoding::decode(&s)
                .map(|decoded| decoded.into_owned())
                .unwrap_or(s)
        })
        .map(|s| path_component(&s))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

/// User-supplied values must not introduce extra path levels.
fn path_component(value: &str) -> String {
    value.trim().replace(['/', '\\'], "_")
}
