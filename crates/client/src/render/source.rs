//! Where preview templates come from.

use super::Variant;
use linkpreview_core::{AppConfig, Error};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DEFAULT_WITH_IMAGE: &str = r#"<div class="jekyll-linkpreview-wrapper">
  <p><a href="{{ link_url }}" target="_blank">{{ link_url }}</a></p>
  <div class="jekyll-linkpreview-wrapper-inner">
    <div class="jekyll-linkpreview-content">
      <div class="jekyll-linkpreview-image">
        <a href="{{ link_url }}" target="_blank">
          <img src="{{ link_image }}" />
        </a>
      </div>
      <div class="jekyll-linkpreview-body">
        <h2 class="jekyll-linkpreview-title">
          <a href="{{ link_url }}" target="_blank">{{ link_title }}</a>
        </h2>
        <div class="jekyll-linkpreview-description">{{ link_description }}</div>
      </div>
    </div>
    <div class="jekyll-linkpreview-footer">
      <a href="{{ link_domain }}" target="_blank">{{ link_domain }}</a>
    </div>
  </div>
</div>
"#;

const DEFAULT_WITHOUT_IMAGE: &str = r#"<div class="jekyll-linkpreview-wrapper">
  <p><a href="{{ link_url }}" target="_blank">{{ link_url }}</a></p>
  <div class="jekyll-linkpreview-wrapper-inner">
    <div class="jekyll-linkpreview-content">
      <div class="jekyll-linkpreview-body">
        <h2 class="jekyll-linkpreview-title">
          <a href="{{ link_url }}" target="_blank">{{ link_title }}</a>
        </h2>
        <div class="jekyll-linkpreview-description">{{ link_description }}</div>
      </div>
    </div>
    <div class="jekyll-linkpreview-footer">
      <a href="{{ link_domain }}" target="_blank">{{ link_domain }}</a>
    </div>
  </div>
</div>
"#;

/// Where a template's source text was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    Builtin,
    File(PathBuf),
}

impl fmt::Display for TemplateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => f.write_str("built-in template"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Liquid source text ready to be parsed and rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableTemplate {
    pub origin: TemplateOrigin,
    pub source: String,
}

/// A provider of templates per variant.
///
/// `Ok(None)` means "nothing here, try the next source".
pub trait TemplateSource: Send + Sync {
    fn resolve(&self, variant: Variant) -> Result<Option<RenderableTemplate>, Error>;
}

/// The default fragments. Always resolves.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl BuiltinTemplates {
    pub fn template(variant: Variant) -> RenderableTemplate {
        let source = match variant {
            Variant::WithImage => DEFAULT_WITH_IMAGE,
            Variant::WithoutImage => DEFAULT_WITHOUT_IMAGE,
        };
        RenderableTemplate { origin: TemplateOrigin::Builtin, source: source.to_string() }
    }
}

impl TemplateSource for BuiltinTemplates {
    fn resolve(&self, variant: Variant) -> Result<Option<RenderableTemplate>, Error> {
        Ok(Some(Self::template(variant)))
    }
}

/// User templates looked up in a directory, one file per variant.
///
/// Existence is checked on every resolve, so adding or removing a file takes
/// effect for the next preview.
#[derive(Debug, Clone)]
pub struct FileTemplates {
    dir: PathBuf,
    with_image: String,
    without_image: String,
}

impl FileTemplates {
    pub fn new(dir: impl Into<PathBuf>, with_image: impl Into<String>, without_image: impl Into<String>) -> Self {
        Self { dir: dir.into(), with_image: with_image.into(), without_image: without_image.into() }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.template_dir, &config.template_with_image, &config.template_without_image)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, variant: Variant) -> PathBuf {
        match variant {
            Variant::WithImage => self.dir.join(&self.with_image),
            Variant::WithoutImage => self.dir.join(&self.without_image),
        }
    }
}

impl TemplateSource for FileTemplates {
    fn resolve(&self, variant: Variant) -> Result<Option<RenderableTemplate>, Error> {
        let path = self.path(variant);
        // Blocking read: templates are small and rendering is synchronous.
        match std::fs::read_to_string(&path) {
            Ok(source) => Ok(Some(RenderableTemplate { origin: TemplateOrigin::File(path), source })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Template(format!("failed to read {}: {}", path.display(), e))),
        }
    }
}
