//! Per-render context: page data handed to components and the counter
//! that keeps multiple explorer instances on one page distinct.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Data about the page a component renders into.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PageContext {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub locale: String,
    /// Anything else the build pipeline attaches to the page.
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PageContext {
    pub fn new(slug: &str, title: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            locale: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

/// Render-pass scoped state. Each explorer created during one pass
/// receives a distinct instance id; a fresh pass starts counting from
/// zero again.
#[derive(Debug, Default)]
pub struct RenderContext {
    next_instance: u32,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next explorer instance id.
    pub fn next_instance_id(&mut self) -> String {
        let id = format!("explorer-{}", self.next_instance);
        self.next_instance += 1;
        id
    }

    pub fn instances_created(&self) -> u32 {
        self.next_instance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_ids_are_sequential_and_distinct() {
        let mut ctx = RenderContext::new();
        assert_eq!(ctx.next_instance_id(), "explorer-0");
        assert_eq!(ctx.next_instance_id(), "explorer-1");
        assert_eq!(ctx.next_instance_id(), "explorer-2");
        assert_eq!(ctx.instances_created(), 3);
    }

    #[test]
    fn fresh_context_restarts_numbering() {
        let mut first = RenderContext::new();
        first.next_instance_id();
        first.next_instance_id();

        let mut second = RenderContext::new();
        assert_eq!(second.next_instance_id(), "explorer-0");
    }

    #[test]
    fn page_context_keeps_unknown_fields() {
        let json = r#"{"slug": "blog/hello", "title": "Hello", "readingTime": 4}"#;
        let ctx: PageContext = serde_json::from_str(json).unwrap();
        assert_eq!(ctx.slug, "blog/hello");
        assert_eq!(ctx.extra["readingTime"], serde_json::json!(4));
    }
}
