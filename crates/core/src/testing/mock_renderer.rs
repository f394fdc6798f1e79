//! Mock template renderer for testing.

use std::sync::{Arc, Mutex};

use crate::templates::{
    subject_for, BodyFormat, NotificationContext, NotificationKind, RenderedEmail,
    TemplateError, TemplateRenderer,
};

/// Mock implementation of the TemplateRenderer trait.
///
/// Produces a plain one-line body naming the notification kind, and can be
/// told to fail the next render.
#[derive(Debug, Clone, Default)]
pub struct MockRenderer {
    rendered: Arc<Mutex<Vec<NotificationKind>>>,
    next_error: Arc<Mutex<Option<TemplateError>>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notification kinds rendered so far, including failed renders.
    pub fn rendered_kinds(&self) -> Vec<NotificationKind> {
        self.rendered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Configure the next render to fail with the given error.
    pub fn set_next_error(&self, error: TemplateError) {
        *self.next_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(error);
    }
}

impl TemplateRenderer for MockRenderer {
    fn render(
        &self,
        kind: NotificationKind,
        context: &NotificationContext,
    ) -> Result<RenderedEmail, TemplateError> {
        self.rendered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(kind);

        if let Some(error) = self
            .next_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            return Err(error);
        }

        Ok(RenderedEmail {
            subject: subject_for(kind, context),
            body: format!(
                "{} for {} {}: {}",
                kind.template_stem(),
                context.first_name,
                context.last_name,
                context.file_url.as_deref().unwrap_or(&context.file_name)
            ),
            format: BodyFormat::Text,
        })
    }
}
