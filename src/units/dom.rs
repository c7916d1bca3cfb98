// * Read-only DOM access used by the detail page resolver.
// * The resolver only walks tables, rows, cells and label elements, so the tree is
// * hidden behind a small trait; `scraper` provides the default implementation.

use scraper::node::Node as HtmlNode;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::units::error::UnitError;

static SELECTOR_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("Invalid table selector"));
static SELECTOR_TR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("Invalid tr selector"));
static SELECTOR_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("Invalid cell selector"));
static SELECTOR_LABEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div, span").expect("Invalid label selector"));

/// Navigation primitives over a parsed HTML document.
///
/// Every list is returned in document order.
pub trait DomTree {
    type Node<'a>: Copy
    where
        Self: 'a;

    /// Every `table` element
    fn tables(&self) -> Vec<Self::Node<'_>>;

    /// Every `tr` below a table, nested tables included
    fn rows<'a>(&'a self, table: Self::Node<'a>) -> Vec<Self::Node<'a>>;

    /// Every `td`/`th` below a row
    fn row_cells<'a>(&'a self, row: Self::Node<'a>) -> Vec<Self::Node<'a>>;

    /// Descendant text pieces, each trimmed, concatenated without separator
    fn text_of<'a>(&'a self, node: Self::Node<'a>) -> String;

    /// Every `div`/`span` element
    fn label_elements(&self) -> Vec<Self::Node<'_>>;

    /// The single text the element holds, descending through only-children.
    /// `None` when the element has zero or several children.
    fn own_string<'a>(&'a self, node: Self::Node<'a>) -> Option<String>;

    /// Text of each following sibling (elements and bare text nodes)
    fn sibling_texts<'a>(&'a self, node: Self::Node<'a>) -> Vec<String>;

    fn parent<'a>(&'a self, node: Self::Node<'a>) -> Option<Self::Node<'a>>;
}

/// Turns raw HTML into a [`DomTree`]
pub trait HtmlParser: Send + Sync {
    type Tree: DomTree;

    fn parse(&self, html: &str) -> Result<Self::Tree, UnitError>;
}

/// Lenient HTML5 parser backed by `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperParser;

impl HtmlParser for ScraperParser {
    type Tree = ScraperDom;

    fn parse(&self, html: &str) -> Result<Self::Tree, UnitError> {
        Ok(ScraperDom::parse(html))
    }
}

/// A parsed document. Not `Send`; parse, query and drop it on one thread.
pub struct ScraperDom {
    html: Html,
}

impl ScraperDom {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }
}

// * Mirrors get_text(strip=True): whitespace-only pieces vanish, the rest are glued
fn stripped_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

impl DomTree for ScraperDom {
    type Node<'a> = ElementRef<'a>;

    fn tables(&self) -> Vec<ElementRef<'_>> {
        self.html.select(&SELECTOR_TABLE).collect()
    }

    fn rows<'a>(&'a self, table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        table.select(&SELECTOR_TR).collect()
    }

    fn row_cells<'a>(&'a self, row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        row.select(&SELECTOR_CELL).collect()
    }

    fn text_of<'a>(&'a self, node: ElementRef<'a>) -> String {
        stripped_text(node)
    }

    fn label_elements(&self) -> Vec<ElementRef<'_>> {
        self.html.select(&SELECTOR_LABEL).collect()
    }

    fn own_string<'a>(&'a self, node: ElementRef<'a>) -> Option<String> {
        let mut current = *node;
        loop {
            let mut children = current.children();
            let only = children.next()?;
            if children.next().is_some() {
                return None;
            }
            match only.value() {
                HtmlNode::Text(text) => return Some(String::from(&**text)),
                HtmlNode::Element(_) => current = only,
                _ => return None,
            }
        }
    }

    fn sibling_texts<'a>(&'a self, node: ElementRef<'a>) -> Vec<String> {
        node.next_siblings()
            .filter_map(|sibling| {
                if let Some(el) = ElementRef::wrap(sibling) {
                    Some(stripped_text(el))
                } else {
                    sibling.value().as_text().map(|text| text.trim().to_string())
                }
            })
            .collect()
    }

    fn parent<'a>(&'a self, node: ElementRef<'a>) -> Option<ElementRef<'a>> {
        node.parent().and_then(ElementRef::wrap)
    }
}
