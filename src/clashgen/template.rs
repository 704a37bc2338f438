use crate::error::{GenError, Result};
use minijinja::{path_loader, Environment, ErrorKind};
use serde::Serialize;
use std::path::Path;

/// A subscription template, parsed once and rendered once per user.
///
/// The template's parent directory is the loader search root, so relative
/// `{% include %}`/`{% extends %}` references resolve next to the template.
#[derive(Debug)]
pub struct ConfigTemplate {
    env: Environment<'static>,
    name: String,
}

impl ConfigTemplate {
    /// Resolves and parses the template at `path`.
    ///
    /// A missing template and a template that fails to parse are distinct
    /// fatal errors; generation cannot proceed without a usable template.
    pub fn load(path: &Path) -> Result<Self> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| GenError::TemplateNotFound(path.display().to_string()))?
            .to_string();

        let mut env = Environment::new();
        env.set_loader(path_loader(dir));

        if let Err(e) = env.get_template(&name) {
            return match e.kind() {
                ErrorKind::TemplateNotFound => Err(GenError::TemplateNotFound(name)),
                _ => Err(GenError::TemplateSyntax {
                    path: path.to_path_buf(),
                    source: e,
                }),
            };
        }
        Ok(Self { env, name })
    }

    /// Renders the template with `ctx`. The environment caches the compiled
    /// template, so repeated calls do not re-parse.
    pub fn render<S: Serialize>(&self, ctx: &S) -> std::result::Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(&self.name)?;
        tmpl.render(ctx)
    }
}
