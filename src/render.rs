//! Static markup emission: one deterministic HTML fragment per explorer
//! instance plus the JSON payload the client script hydrates from.

use serde_json::{json, Value};

use crate::context::PageContext;
use crate::explorer::ExplorerController;
use crate::trie::FileTrieNode;

/// The emitted artifacts for one explorer instance.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedExplorer {
    pub html: String,
    pub script_payload: Value,
}

/// Render a controller's current display tree and state. Pure with
/// respect to the controller: the same state always yields the same
/// bytes. The page context is forwarded untouched in the payload so
/// mounted sub-components see exactly what the layout supplied.
pub fn render(controller: &ExplorerController, page: &PageContext) -> RenderedExplorer {
    RenderedExplorer {
        html: render_markup(controller),
        script_payload: script_payload(controller, page),
    }
}

fn render_markup(controller: &ExplorerController) -> String {
    let options = controller.options();
    let mut html = String::new();
    html.push_str(&format!(
        "<div id=\"{}\" class=\"explorer\" data-behavior=\"{}\" data-collapsed=\"{}\" data-savestate=\"{}\">\n",
        escape_html(controller.id()),
        options.folder_click_behavior.as_str(),
        options.folder_default_state.as_str(),
        options.use_saved_state,
    ));
    html.push_str(&format!(
        "  <h2 class=\"explorer-title\">{}</h2>\n",
        escape_html(controller.title()),
    ));
    html.push_str("  <ul class=\"explorer-ul\">\n");
    for child in &controller.display_tree().children {
        render_node(controller, child, child.slug_segment(), &mut html);
    }
    html.push_str("  </ul>\n");
    if !options.mobile_components.is_empty() {
        html.push_str("  <div class=\"mobile-only explorer-mobile\">\n");
        for name in &options.mobile_components {
            html.push_str(&format!(
                "    <section data-component=\"{}\"></section>\n",
                escape_html(name),
            ));
        }
        html.push_str("  </div>\n");
    }
    html.push_str("</div>\n");
    html
}

fn render_node(
    controller: &ExplorerController,
    node: &FileTrieNode,
    path: &str,
    html: &mut String,
) {
    if node.is_folder() {
        // The whole subtree is always in the markup; collapse is a class
        // the client script flips without re-rendering.
        let collapsed = controller.state().is_collapsed(path);
        let open = if collapsed { "" } else { " open" };
        let href = if controller.options().folder_links {
            format!(" data-href=\"/{}\"", escape_html(path))
        } else {
            String::new()
        };
        html.push_str(&format!(
            "<li><button class=\"folder-button\" data-folderpath=\"{}\" aria-expanded=\"{}\"{}>{}</button>\n",
            escape_html(path),
            !collapsed,
            href,
            escape_html(&node.display_name),
        ));
        html.push_str(&format!("<div class=\"folder-outer{open}\"><ul class=\"content\">\n"));
        for child in &node.children {
            let child_path = format!("{}/{}", path, child.slug_segment());
            render_node(controller, child, &child_path, html);
        }
        html.push_str("</ul></div></li>\n");
    } else {
        html.push_str(&format!(
            "<li><a href=\"/{}\">{}</a></li>\n",
            escape_html(path),
            escape_html(&node.display_name),
        ));
    }
}

fn script_payload(controller: &ExplorerController, page: &PageContext) -> Value {
    let options = controller.options();
    json!({
        "id": controller.id(),
        "page": serde_json::to_value(page).unwrap_or(Value::Null),
        "transform": controller.spec().describe(),
        "options": {
            "behavior": options.folder_click_behavior.as_str(),
            "defaultState": options.folder_default_state.as_str(),
            "useSavedState": options.use_saved_state,
            "folderLinks": options.folder_links,
            "mobileComponents": options.mobile_components,
        },
    })
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{PageContext, RenderContext};
    use crate::explorer::{ClickBehavior, ExplorerOptions};
    use crate::pipeline::TransformSpec;
    use crate::state::CollapseStateStore;
    use crate::trie::SiteEntry;

    fn controller(options: ExplorerOptions) -> ExplorerController {
        let tree = FileTrieNode::from_entries(&[
            SiteEntry::file("a/x.md"),
            SiteEntry::file("readme.md"),
        ]);
        let mut ctx = RenderContext::new();
        ExplorerController::new(
            &mut ctx,
            options,
            TransformSpec::default(),
            tree,
            CollapseStateStore::in_memory(true),
        )
        .unwrap()
    }

    fn page() -> PageContext {
        PageContext::new("index", "My Site")
    }

    #[test]
    fn rendering_is_deterministic() {
        let c = controller(ExplorerOptions::default());
        assert_eq!(render(&c, &page()), render(&c, &page()));
    }

    #[test]
    fn markup_carries_instance_and_option_attributes() {
        let c = controller(ExplorerOptions::default());
        let html = render(&c, &page()).html;
        assert!(html.contains("id=\"explorer-0\""));
        assert!(html.contains("data-behavior=\"link\""));
        assert!(html.contains("data-collapsed=\"collapsed\""));
        assert!(html.contains("data-savestate=\"true\""));
        assert!(html.contains("data-folderpath=\"a\""));
        assert!(html.contains("href=\"/readme.md\""));
    }

    #[test]
    fn collapsed_subtree_is_in_markup_but_not_open() {
        let c = controller(ExplorerOptions::default());
        let html = render(&c, &page()).html;
        // The file under the collapsed folder is still emitted.
        assert!(html.contains("href=\"/a/x.md\""));
        assert!(html.contains("class=\"folder-outer\""));
        assert!(!html.contains("folder-outer open"));
    }

    #[test]
    fn expanded_folder_gets_open_class() {
        let mut c = controller(ExplorerOptions {
            folder_click_behavior: ClickBehavior::Collapse,
            ..ExplorerOptions::default()
        });
        c.activate("a");
        let html = render(&c, &page()).html;
        assert!(html.contains("folder-outer open"));
        assert!(html.contains("aria-expanded=\"true\""));
    }

    #[test]
    fn titles_and_names_are_escaped() {
        let c = controller(ExplorerOptions {
            title: Some("<script>alert(1)</script>".to_string()),
            ..ExplorerOptions::default()
        });
        let html = render(&c, &page()).html;
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn mobile_components_render_as_sections() {
        let c = controller(ExplorerOptions {
            mobile_components: vec!["reader-mode".to_string(), "dark-mode".to_string()],
            ..ExplorerOptions::default()
        });
        let html = render(&c, &page()).html;
        assert!(html.contains("data-component=\"reader-mode\""));
        assert!(html.contains("data-component=\"dark-mode\""));
    }

    #[test]
    fn payload_describes_transform_and_options() {
        let c = controller(ExplorerOptions::default());
        let payload = render(&c, &page()).script_payload;
        assert_eq!(payload["id"], "explorer-0");
        assert_eq!(
            payload["transform"]["order"],
            serde_json::json!(["filter", "map", "sort"])
        );
        assert_eq!(payload["options"]["behavior"], "link");
        assert_eq!(payload["options"]["useSavedState"], true);
    }

    #[test]
    fn payload_forwards_page_context_unmodified() {
        let c = controller(ExplorerOptions::default());
        let mut ctx = PageContext::new("blog/hello", "Hello");
        ctx.extra
            .insert("readingTime".to_string(), serde_json::json!(4));
        let payload = render(&c, &ctx).script_payload;
        assert_eq!(payload["page"]["slug"], "blog/hello");
        assert_eq!(payload["page"]["title"], "Hello");
        assert_eq!(payload["page"]["readingTime"], 4);
    }
}
