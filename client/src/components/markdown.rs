//! Markdown rendering for memo bodies.

#[cfg(test)]
#[path = "markdown_test.rs"]
mod markdown_test;

use leptos::prelude::*;
use pulldown_cmark::{Event, Options, Parser, html};

/// Render user-authored markdown as HTML inside a wrapper `div`.
#[component]
pub fn Markdown(#[prop(into)] source: Signal<String>) -> impl IntoView {
    view! { <div class="markdown-body" inner_html=move || render_markdown_html(&source.get())></div> }
}

pub fn render_markdown_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    // Raw HTML from user input is dropped before rendering.
    let parser = Parser::new_ext(markdown, options).filter_map(|event| match event {
        Event::Html(_) | Event::InlineHtml(_) => None,
        other => Some(other),
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}
