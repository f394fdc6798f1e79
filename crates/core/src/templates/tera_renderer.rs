use std::path::Path;
use tera::{Context, Tera};
use tracing::info;

use super::defaults::TEMPLATES;
use super::{
    subject_for, BodyFormat, NotificationContext, NotificationKind, RenderedEmail,
    TemplateError, TemplateRenderer,
};

/// Tera-backed renderer with built-in templates.
///
/// Files named `<kind>.html` / `<kind>.txt` in the override directory replace
/// the matching built-in template. Other files are ignored. Names ending in
/// `.html` are auto-escaped.
pub struct TeraRenderer {
    tera: Tera,
    format: BodyFormat,
}

impl TeraRenderer {
    /// Renderer using only the built-in templates.
    pub fn new(format: BodyFormat) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())
            .map_err(|e| TemplateError::Load(e.to_string()))?;
        Ok(Self { tera, format })
    }

    /// Renderer with built-ins overridden by files from `dir`.
    pub fn with_overrides(format: BodyFormat, dir: &Path) -> Result<Self, TemplateError> {
        let mut renderer = Self::new(format)?;

        let entries = std::fs::read_dir(dir)
            .map_err(|e| TemplateError::Load(format!("{}: {}", dir.display(), e)))?;

        let known: Vec<String> = NotificationKind::ALL
            .iter()
            .flat_map(|kind| {
                [
                    kind.template_name(BodyFormat::Html),
                    kind.template_name(BodyFormat::Text),
                ]
            })
            .collect();

        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !known.iter().any(|k| k == name) {
                continue;
            }
            renderer
                .tera
                .add_template_file(&path, Some(name))
                .map_err(|e| TemplateError::Load(format!("{}: {}", path.display(), e)))?;
            info!(template = name, "Loaded template override");
        }

        Ok(renderer)
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(
        &self,
        kind: NotificationKind,
        context: &NotificationContext,
    ) -> Result<RenderedEmail, TemplateError> {
        let template = kind.template_name(self.format);
        let render_err = |message: String| TemplateError::Render {
            template: template.clone(),
            message,
        };

        let tera_context =
            Context::from_serialize(context).map_err(|e| render_err(e.to_string()))?;
        let body = self
            .tera
            .render(&template, &tera_context)
            .map_err(|e| render_err(e.to_string()))?;

        Ok(RenderedEmail {
            subject: subject_for(kind, context),
            body,
            format: self.format,
        })
    }
}
