//! HTML rendering of preview records.
//!
//! A record renders through one of two variants, chosen by whether it has an
//! image. Templates are looked up in the renderer's sources in order, with
//! the built-in fragments as the last resort. Every template is Liquid and
//! sees the caller's payload plus the `link_*` fields. Values are
//! interpolated as-is; nothing is HTML-escaped.

pub mod source;

pub use source::{BuiltinTemplates, FileTemplates, RenderableTemplate, TemplateOrigin, TemplateSource};

use linkpreview_core::{AppConfig, Error, PreviewRecord};
use liquid::model::Value;
use liquid::{Object, Parser, ParserBuilder};

/// Which template a record renders through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    WithImage,
    WithoutImage,
}

/// The fields bound into a template for one preview.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// The URL the caller asked to preview.
    pub url: &'a str,
    pub title: Option<&'a str>,
    pub image: Option<&'a str>,
    pub description: Option<&'a str>,
    pub domain: &'a str,
}

impl<'a> RenderContext<'a> {
    pub fn new(url: &'a str, record: &'a PreviewRecord) -> Self {
        Self {
            url,
            title: record.title.as_deref(),
            image: record.image.as_deref(),
            description: record.description.as_deref(),
            domain: &record.domain,
        }
    }

    pub fn variant(&self) -> Variant {
        if self.image.is_some() { Variant::WithImage } else { Variant::WithoutImage }
    }

    /// `payload` merged with the `link_*` fields; the fields win on conflict.
    ///
    /// `link_image` is bound for both variants, as nil when there is no image,
    /// so image-less templates may still mention it.
    pub fn globals(&self, payload: &Object) -> Object {
        fn value(field: Option<&str>) -> Value {
            field.map_or(Value::Nil, |s| Value::scalar(s.to_string()))
        }

        let mut globals = payload.clone();
        globals.insert("link_url".into(), Value::scalar(self.url.to_string()));
        globals.insert("link_title".into(), value(self.title));
        globals.insert("link_image".into(), value(self.image));
        globals.insert("link_description".into(), value(self.description));
        globals.insert("link_domain".into(), Value::scalar(self.domain.to_string()));
        globals
    }
}

/// The ambient payload built from the configured `site` table, exposed as `site`.
pub fn site_payload(config: &AppConfig) -> Result<Object, Error> {
    let site = liquid::model::to_value(&config.site)
        .map_err(|e| Error::Template(format!("invalid site payload: {}", e)))?;
    let mut payload = Object::new();
    payload.insert("site".into(), site);
    Ok(payload)
}

/// Renders preview records through the first template source that has one.
pub struct TemplateRenderer {
    parser: Parser,
    sources: Vec<Box<dyn TemplateSource>>,
    payload: Object,
}

impl TemplateRenderer {
    /// A renderer that only knows the built-in fragments.
    pub fn new() -> Result<Self, Error> {
        let parser = ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| Error::Template(format!("failed to build template parser: {}", e)))?;
        Ok(Self { parser, sources: Vec::new(), payload: Object::new() })
    }

    /// Add a source, consulted after those added earlier and before the built-ins.
    pub fn with_source(mut self, source: impl TemplateSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Ambient values visible to every template, such as site settings.
    pub fn with_payload(mut self, payload: Object) -> Self {
        self.payload = payload;
        self
    }

    /// The template used for `variant`: the first source that has one, else the built-in.
    pub fn template_for(&self, variant: Variant) -> Result<RenderableTemplate, Error> {
        for source in &self.sources {
            if let Some(template) = source.resolve(variant)? {
                return Ok(template);
            }
        }
        Ok(BuiltinTemplates::template(variant))
    }

    pub fn render(&self, context: &RenderContext<'_>) -> Result<String, Error> {
        let variant = context.variant();
        let template = self.template_for(variant)?;
        tracing::debug!("rendering {:?} preview of {} with {}", variant, context.url, template.origin);

        let parsed = self
            .parser
            .parse(&template.source)
            .map_err(|e| Error::Template(format!("{}: {}", template.origin, e)))?;
        parsed
            .render(&context.globals(&self.payload))
            .map_err(|e| Error::Template(format!("{}: {}", template.origin, e)))
    }
}
