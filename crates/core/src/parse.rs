//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! listing pages and navigating the tree with CSS selectors. Parsing never
//! fails: malformed markup is repaired by the html5ever tree builder the same
//! way a browser would repair it.
//!
//! # Example
//!
//! ```rust
//! use heatwatch_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use scraper::{Html, Selector};

use crate::{HeatwatchError, Result};

/// Represents a parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Selects elements using a CSS selector string.
    ///
    /// # Errors
    ///
    /// Returns [`HeatwatchError::InvalidSelector`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile(selector, "document")?;
        Ok(self.select_all(&sel))
    }

    /// Selects every element matching a precompiled selector, in document order.
    pub fn select_all(&'_ self, selector: &Selector) -> Vec<Element<'_>> {
        self.html.select(selector).map(|el| Element { element: el }).collect()
    }
}

/// A wrapper around scraper's ElementRef.
///
/// Element represents a single node in the document tree. For listing pages
/// an Element is usually one product fragment.
///
/// # Example
///
/// ```rust
/// use heatwatch_core::parse::Document;
///
/// let html = r#"<div class="rating" title="4 stars out of 5">Rated</div>"#;
/// let doc = Document::parse(html);
/// let rating = &doc.select("div.rating").unwrap()[0];
///
/// assert_eq!(rating.text(), "Rated");
/// assert_eq!(rating.attr("title"), Some("4 stars out of 5"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the text content of this element.
    ///
    /// Returns the concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute, or `None` if it is not present.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Returns the first descendant matching `selector`.
    pub fn select_first(&self, selector: &Selector) -> Option<Element<'a>> {
        self.descendants(selector).next()
    }

    /// Returns every descendant matching `selector`, in document order.
    pub fn select_all(&self, selector: &Selector) -> Vec<Element<'a>> {
        self.descendants(selector).collect()
    }

    /// Returns true if any descendant matches `selector`.
    pub fn contains(&self, selector: &Selector) -> bool {
        self.descendants(selector).next().is_some()
    }

    /// Selects descendants using a CSS selector string.
    ///
    /// # Errors
    ///
    /// Returns [`HeatwatchError::InvalidSelector`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile(selector, "element")?;
        Ok(self.select_all(&sel))
    }

    /// The element itself is never one of its own descendants.
    fn descendants(&self, selector: &Selector) -> impl Iterator<Item = Element<'a>> {
        let own_id = self.element.id();
        let scope = self.element;
        scope
            .select(selector)
            .filter(move |el| el.id() != own_id)
            .map(|el| Element { element: el })
    }
}

/// Compiles a CSS selector, attributing failures to `field`.
pub fn compile(selector: &str, field: &'static str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| HeatwatchError::InvalidSelector { field, reason: e.to_string() })
}
