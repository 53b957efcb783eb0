//! Client code for linkpreview.
//!
//! This crate provides the fetch pipeline, metadata extraction, template
//! rendering and the resolver that ties them to the metadata cache.

pub mod extract;
pub mod fetch;
pub mod preview;
pub mod render;

pub use extract::ExtractionStrategy;
pub use fetch::{FetchClient, FetchConfig, FetchedPage, Fetcher};
pub use preview::LinkPreview;
pub use render::{
    BuiltinTemplates, FileTemplates, RenderContext, RenderableTemplate, TemplateRenderer, TemplateSource, Variant, site_payload,
};
