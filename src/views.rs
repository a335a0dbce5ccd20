//! HTML pages for the hook's admin surface, rendered through Tera.
//!
//! Templates are embedded at build time and end in `.html`, so Tera
//! autoescapes every interpolated value.

use std::sync::LazyLock;

use serde::Serialize;
use tera::{Context, Tera};

use crate::errors::HookError;
use crate::plugin::{EditForm, ViewPage};

const VIEW_TEMPLATE: &str = "hook/view.html";
const EDIT_TEMPLATE: &str = "hook/edit.html";

const EDIT_TITLE: &str = "Edit AWS Simple Notification Service hook";

static TEMPLATES: LazyLock<Result<Tera, tera::Error>> = LazyLock::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (VIEW_TEMPLATE, include_str!("../templates/hook/view.html")),
        (EDIT_TEMPLATE, include_str!("../templates/hook/edit.html")),
    ])?;
    Ok(tera)
});

#[derive(Serialize)]
struct ChannelOption<'a> {
    id: &'a str,
    name: &'a str,
    selected: bool,
}

#[derive(Serialize)]
struct TextField<'a> {
    name: &'static str,
    label: &'static str,
    value: &'a str,
}

fn render(template: &str, context: &Context) -> Result<String, HookError> {
    let tera = TEMPLATES.as_ref().map_err(HookError::from_template)?;
    tera.render(template, context)
        .map_err(|e| HookError::from_template(&e))
}

/// Render the read-only summary of the hook instance.
///
/// # Errors
///
/// Returns `HookError::TemplateError` if the page fails to render.
pub fn render_view_page(view: &ViewPage, edit_url: &str) -> Result<String, HookError> {
    let mut context = Context::new();
    context.insert("page", view);
    context.insert("edit_url", edit_url);

    render(VIEW_TEMPLATE, &context)
}

/// Render the settings form. The form posts back to `action_url` with `save=1`.
///
/// # Errors
///
/// Returns `HookError::TemplateError` if the page fails to render.
pub fn render_edit_page(form: &EditForm, action_url: &str) -> Result<String, HookError> {
    let sep = if action_url.contains('?') { '&' } else { '?' };

    let channels: Vec<ChannelOption<'_>> = form
        .channels
        .iter()
        .map(|(id, name)| ChannelOption {
            id,
            name,
            selected: *id == form.config.channel,
        })
        .collect();

    let fields = [
        TextField {
            name: "botname",
            label: "Bot name",
            value: &form.config.botname,
        },
        TextField {
            name: "icon_emoji",
            label: "Icon emoji",
            value: &form.config.icon_emoji,
        },
        TextField {
            name: "icon_url",
            label: "Icon URL",
            value: &form.config.icon_url,
        },
    ];

    let mut context = Context::new();
    context.insert("title", EDIT_TITLE);
    context.insert("error", &form.error);
    context.insert("action_url", &format!("{action_url}{sep}save=1"));
    context.insert("channels", &channels);
    context.insert("topics_text", &form.topics_text);
    context.insert("fields", &fields);

    render(EDIT_TEMPLATE, &context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::HookConfig;

    fn config() -> HookConfig {
        HookConfig {
            channel: "C2".into(),
            channel_name: "#alerts".into(),
            topics: vec![".*prod.*".into(), "<script>".into()],
            botname: "SNS \"bot\"".into(),
            icon_emoji: String::new(),
            icon_url: "https://hooks.example.com/plugins/aws_sns/icon_48.png".into(),
        }
    }

    #[test]
    fn test_templates_parse() {
        assert!(TEMPLATES.is_ok(), "{:?}", TEMPLATES.as_ref().err());
    }

    #[test]
    fn test_view_page_lists_topics_escaped() {
        let view = ViewPage {
            title: "AWS Simple Notification Service".into(),
            label: "Post SNS notifications to #alerts as bot".into(),
            config: config(),
            saved: true,
        };
        let html = render_view_page(&view, "/edit").unwrap();

        assert!(html.contains("<h1>AWS Simple Notification Service</h1>"));
        assert!(html.contains("Your changes have been saved."));
        assert!(html.contains("<code>.*prod.*</code>"));
        assert!(html.contains("<code>&lt;script&gt;</code>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("Edit settings</a>"));
        assert!(html.contains("<img src=\""));
        assert!(!html.contains("Icon emoji"));
    }

    #[test]
    fn test_view_page_without_topics_warns() {
        let view = ViewPage {
            title: "t".into(),
            label: "l".into(),
            config: HookConfig::default(),
            saved: false,
        };
        let html = render_view_page(&view, "/edit").unwrap();
        assert!(html.contains("No topics configured"));
        assert!(!html.contains("have been saved"));
        assert!(!html.contains("<ul>"));
    }

    #[test]
    fn test_edit_page_prefills_form() {
        let form = EditForm {
            config: config(),
            topics_text: ".*prod.*\n<script>".into(),
            channels: vec![("C2".into(), "#alerts".into()), ("C1".into(), "#general".into())],
            error: None,
        };
        let html = render_edit_page(&form, "/edit?id=7").unwrap();

        assert!(html.contains("id=7&amp;save=1\""));
        assert!(html.contains("<option value=\"C2\" selected>#alerts</option>"));
        assert!(html.contains("<option value=\"C1\">#general</option>"));
        assert!(html.contains(">.*prod.*\n&lt;script&gt;</textarea>"));
        assert!(html.contains("value=\"SNS &quot;bot&quot;\""));
        assert!(html.contains("name=\"icon_emoji\" value=\"\""));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_edit_page_shows_error() {
        let form = EditForm {
            error: Some("Invalid topic pattern 'broken(': unclosed group <b>".into()),
            ..EditForm::default()
        };
        let html = render_edit_page(&form, "/edit").unwrap();
        assert!(html.contains("<p class=\"error\">Invalid topic pattern "));
        assert!(html.contains("unclosed group &lt;b&gt;</p>"));
        assert!(!html.contains("'broken('"));
        assert!(html.contains("edit?save=1\""));
    }
}
