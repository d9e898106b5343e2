//! Element locators.
//!
//! A [`Locator`] says *how* to find elements; a [`super::UiDriver`] decides how to
//! resolve it. Browser drivers turn locators into DOM queries with [`Locator::to_js`];
//! in-memory drivers match on the variants directly.

use std::fmt;

/// Description of a set of elements on the page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// `[data-testid="<id>"]`
    TestId(String),
    /// Arbitrary CSS selector
    Css(String),
    /// Deepest elements whose text contains the needle (case-sensitive)
    Text(String),
    /// Deepest elements whose text contains any of the needles (case-insensitive)
    TextMatching(Vec<String>),
    /// Heading of the given level (`h1`, or `role=heading` with `aria-level`)
    Heading(u8),
    /// Buttons whose label contains `label` (case-insensitive), inside `scope` if given
    Button { scope: Option<String>, label: String },
    /// Elements matching `css` whose text contains none of `excluded`
    CssWithoutText { css: String, excluded: Vec<String> },
}

impl Locator {
    pub fn test_id(id: impl Into<String>) -> Self {
        Locator::TestId(id.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn text(needle: impl Into<String>) -> Self {
        Locator::Text(needle.into())
    }

    pub fn button(label: impl Into<String>) -> Self {
        Locator::Button {
            scope: None,
            label: label.into(),
        }
    }

    pub fn button_within(scope: impl Into<String>, label: impl Into<String>) -> Self {
        Locator::Button {
            scope: Some(scope.into()),
            label: label.into(),
        }
    }

    /// CSS selector for a test id
    pub fn test_id_selector(id: &str) -> String {
        format!("[data-testid={}]", quote(id))
    }

    /// JavaScript expression evaluating to an `Array` of the matched elements
    pub fn to_js(&self) -> String {
        match self {
            Locator::TestId(id) => query_all(&Self::test_id_selector(id)),
            Locator::Css(selector) => query_all(selector),
            Locator::Text(needle) => deepest_text_match(
                &format!("[{}]", quote(needle)),
                "(t, n) => t.includes(n)",
            ),
            Locator::TextMatching(needles) => {
                let lowered: Vec<String> = needles.iter().map(|n| quote(&n.to_lowercase())).collect();
                deepest_text_match(
                    &format!("[{}]", lowered.join(", ")),
                    "(t, n) => t.toLowerCase().includes(n)",
                )
            }
            Locator::Heading(level) => query_all(&format!(
                "h{level}, [role=\"heading\"][aria-level=\"{level}\"]"
            )),
            Locator::Button { scope, label } => {
                let roots = match scope {
                    Some(scope) => format!("Array.from(document.querySelectorAll({}))", quote(scope)),
                    None => "[document]".to_string(),
                };
                format!(
                    "{roots}.flatMap(r => Array.from(r.querySelectorAll('button, [role=\"button\"]'))).filter(b => (b.textContent || '').toLowerCase().includes({}))",
                    quote(&label.to_lowercase())
                )
            }
            Locator::CssWithoutText { css, excluded } => {
                let excluded: Vec<String> = excluded.iter().map(|t| quote(t)).collect();
                format!(
                    "{}.filter(el => ![{}].some(t => (el.textContent || '').includes(t)))",
                    query_all(css),
                    excluded.join(", ")
                )
            }
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::TestId(id) => write!(f, "test id '{}'", id),
            Locator::Css(selector) => write!(f, "css '{}'", selector),
            Locator::Text(needle) => write!(f, "text '{}'", needle),
            Locator::TextMatching(needles) => write!(f, "text matching {:?}", needles),
            Locator::Heading(level) => write!(f, "heading level {}", level),
            Locator::Button { scope: Some(scope), label } => {
                write!(f, "button '{}' within '{}'", label, scope)
            }
            Locator::Button { scope: None, label } => write!(f, "button '{}'", label),
            Locator::CssWithoutText { css, excluded } => {
                write!(f, "css '{}' without {:?}", css, excluded)
            }
        }
    }
}

/// JSON string literal, which is also a valid JavaScript string literal
pub(crate) fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn query_all(selector: &str) -> String {
    format!("Array.from(document.querySelectorAll({}))", quote(selector))
}

fn deepest_text_match(needles: &str, predicate: &str) -> String {
    format!(
        "(() => {{ const ns = {needles}; const m = {predicate}; const hit = el => ns.some(n => m(el.textContent || '', n)); return Array.from(document.body.querySelectorAll('*')).filter(el => hit(el) && !Array.from(el.children).some(hit)); }})()"
    )
}
