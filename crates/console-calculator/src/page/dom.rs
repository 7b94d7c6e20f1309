//! Mock DOM for the calculator page
//!
//! A small element registry that stands in for the browser document, so the
//! form handler, console demo and error observer can be exercised natively.

use crate::config::PageConfig;
use crate::core::Operation;
use crate::page::demo::DemoButton;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Represents a DOM element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomElement {
    /// Element ID
    pub id: String,
    /// Element tag name
    pub tag: String,
    /// Text content
    pub text_content: String,
    /// Element attributes
    pub attributes: BTreeMap<String, String>,
    /// CSS classes
    pub classes: Vec<String>,
    /// Child elements
    pub children: Vec<DomElement>,
}

impl Default for DomElement {
    fn default() -> Self {
        Self::new("div")
    }
}

impl DomElement {
    /// Creates a new DOM element with the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            id: String::new(),
            tag: tag.to_string(),
            text_content: String::new(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets the ID
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Sets the text content
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text_content = text.to_string();
        self
    }

    /// Adds a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Sets an attribute
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Adds a child element
    #[must_use]
    pub fn with_child(mut self, child: DomElement) -> Self {
        self.children.push(child);
        self
    }

    /// Sets text content
    pub fn set_text(&mut self, text: &str) {
        self.text_content = text.to_string();
    }

    /// Adds a class once
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Removes a class
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Replaces the whole class list (`element.className = ...`)
    pub fn set_class_name(&mut self, class_name: &str) {
        self.classes = class_name.split_whitespace().map(str::to_string).collect();
    }

    /// Checks if element has a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Gets an attribute value
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Renders the element and its children as markup
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut out = format!("<{}", self.tag);
        if !self.id.is_empty() {
            out.push_str(&format!(" id=\"{}\"", escape(&self.id)));
        }
        if !self.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape(&self.classes.join(" "))));
        }
        for (key, value) in &self.attributes {
            out.push_str(&format!(" {key}=\"{}\"", escape(value)));
        }
        out.push('>');
        out.push_str(&escape(&self.text_content));
        for child in &self.children {
            out.push_str(&child.to_markup());
        }
        out.push_str(&format!("</{}>", self.tag));
        out
    }
}

/// Escapes text for inclusion in markup
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// DOM events recorded by the mock document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomEvent {
    /// Click on an element
    Click {
        /// The ID of the clicked element
        element_id: String,
    },
    /// Input value changed
    Input {
        /// The ID of the input element
        element_id: String,
        /// The new value
        value: String,
    },
    /// Form submitted
    Submit {
        /// The ID of the submitted form
        element_id: String,
    },
    /// Document finished loading
    Loaded,
}

impl DomEvent {
    /// Creates a click event
    #[must_use]
    pub fn click(element_id: &str) -> Self {
        Self::Click {
            element_id: element_id.to_string(),
        }
    }

    /// Creates an input event
    #[must_use]
    pub fn input(element_id: &str, value: &str) -> Self {
        Self::Input {
            element_id: element_id.to_string(),
            value: value.to_string(),
        }
    }

    /// Creates a submit event
    #[must_use]
    pub fn submit(element_id: &str) -> Self {
        Self::Submit {
            element_id: element_id.to_string(),
        }
    }
}

/// Mock document: flat id registry plus a parent/child index
#[derive(Debug, Default)]
pub struct MockDom {
    elements: HashMap<String, DomElement>,
    children: HashMap<String, Vec<String>>,
    event_history: Vec<DomEvent>,
}

impl MockDom {
    /// Creates an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the calculator page described by `config`
    #[must_use]
    pub fn calculator_page(config: &PageConfig) -> Self {
        let mut dom = Self::new();

        dom.register_element(DomElement::new("form").with_id(&config.form_id));
        dom.append_child(
            &config.form_id,
            DomElement::new("input")
                .with_id(&config.first_input_id)
                .with_attr("type", "number")
                .with_attr("value", ""),
        );

        let mut select = DomElement::new("select")
            .with_id(&config.operator_id)
            .with_attr("value", Operation::Add.symbol());
        for op in Operation::ALL {
            select = select.with_child(
                DomElement::new("option")
                    .with_attr("value", op.symbol())
                    .with_text(op.symbol()),
            );
        }
        dom.append_child(&config.form_id, select);

        dom.append_child(
            &config.form_id,
            DomElement::new("input")
                .with_id(&config.second_input_id)
                .with_attr("type", "number")
                .with_attr("value", ""),
        );
        dom.append_child(
            &config.form_id,
            DomElement::new("button")
                .with_attr("type", "submit")
                .with_text("Calculate"),
        );

        dom.register_element(DomElement::new("div").with_id(&config.result_id));
        dom.register_element(DomElement::new("div").with_id(&config.debug_info_id));

        dom.register_element(DomElement::new("div").with_id(&config.demo_buttons_id));
        for button in DemoButton::ALL {
            dom.append_child(
                &config.demo_buttons_id,
                DomElement::new("button").with_text(button.label()),
            );
        }

        dom
    }

    /// Registers a root-level element. Elements without an id are ignored.
    pub fn register_element(&mut self, element: DomElement) {
        if !element.id.is_empty() {
            self.elements.insert(element.id.clone(), element);
        }
    }

    /// Removes an element and its child index
    pub fn remove_element(&mut self, id: &str) -> Option<DomElement> {
        self.children.remove(id);
        self.elements.remove(id)
    }

    /// Gets an element by ID
    #[must_use]
    pub fn get_element(&self, id: &str) -> Option<&DomElement> {
        self.elements.get(id)
    }

    /// Gets a mutable element by ID
    pub fn get_element_mut(&mut self, id: &str) -> Option<&mut DomElement> {
        self.elements.get_mut(id)
    }

    /// Looks up an `#id` selector
    #[must_use]
    pub fn query_selector(&self, selector: &str) -> Option<&DomElement> {
        selector.strip_prefix('#').and_then(|id| self.get_element(id))
    }

    /// Appends a child to a parent. Children with an id become addressable.
    pub fn append_child(&mut self, parent_id: &str, child: DomElement) {
        let key = if child.id.is_empty() {
            format!("{parent_id}::{}", self.child_count(parent_id))
        } else {
            child.id.clone()
        };
        self.children
            .entry(parent_id.to_string())
            .or_default()
            .push(key.clone());
        self.elements.insert(key, child);
    }

    /// Children of an element, in insertion order
    #[must_use]
    pub fn children_of(&self, parent_id: &str) -> Vec<&DomElement> {
        self.children
            .get(parent_id)
            .map(|keys| keys.iter().filter_map(|k| self.elements.get(k)).collect())
            .unwrap_or_default()
    }

    /// Number of children of an element
    #[must_use]
    pub fn child_count(&self, parent_id: &str) -> usize {
        self.children.get(parent_id).map_or(0, Vec::len)
    }

    /// Number of children of `parent_id` with the given tag (`#parent > tag`)
    #[must_use]
    pub fn count_children_with_tag(&self, parent_id: &str, tag: &str) -> usize {
        self.children_of(parent_id)
            .iter()
            .filter(|e| e.tag == tag)
            .count()
    }

    /// Input value (`element.value`)
    #[must_use]
    pub fn value(&self, id: &str) -> Option<&str> {
        self.get_element(id).map(|e| e.get_attr("value").unwrap_or(""))
    }

    /// Sets an input value and records an input event
    pub fn set_value(&mut self, id: &str, value: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.attributes.insert("value".to_string(), value.to_string());
        }
        self.event_history.push(DomEvent::input(id, value));
    }

    /// Gets element text by ID
    #[must_use]
    pub fn get_element_text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text_content.as_str())
    }

    /// Appends raw markup to an element's inner HTML (`innerHTML +=`)
    pub fn append_html(&mut self, id: &str, markup: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            let html = elem.attributes.entry("innerHTML".to_string()).or_default();
            html.push_str(markup);
        }
    }

    /// Inner HTML accumulated with [`MockDom::append_html`]
    #[must_use]
    pub fn inner_html(&self, id: &str) -> Option<&str> {
        self.get_element(id)
            .map(|e| e.get_attr("innerHTML").unwrap_or(""))
    }

    /// Records an event
    pub fn dispatch_event(&mut self, event: DomEvent) {
        self.event_history.push(event);
    }

    /// Gets the event history
    #[must_use]
    pub fn event_history(&self) -> &[DomEvent] {
        &self.event_history
    }
}
