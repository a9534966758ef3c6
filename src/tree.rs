//! In-memory geoLink parse tree
//!
//! The validating parser produces a lightweight owned element tree that
//! exposes element names, string attributes and depth-first traversal.
//! Attribute order is preserved as it appeared in the source.

use indexmap::IndexMap;

/// XML element in the parsed geoLink tree
#[derive(Debug, Clone)]
pub struct Element {
    /// Element name
    pub name: String,
    /// Element attributes in source order
    pub attributes: IndexMap<String, String>,
    /// Child elements in source order
    pub children: Vec<Element>,
}

impl Element {
    /// Create a new element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Get an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Set an attribute value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Direct children with the given name
    pub fn find_children(&self, name: &str) -> Vec<&Element> {
        self.children.iter().filter(|e| e.name == name).collect()
    }

    /// Depth-first iterator over this element and all descendants
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// All elements in the subtree (self included) with the given name,
    /// in depth-first document order
    pub fn descendants_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.descendants().filter(move |e| e.name == name)
    }
}

/// Depth-first (preorder) traversal over an element subtree
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        // Push children reversed so the leftmost child is visited first.
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Element {
        let mut root = Element::new("geolinks");
        let mut document = Element::new("document");
        document.set_attribute("id", "1");
        document.add_child(Element::new("file"));
        document.add_child(Element::new("file"));
        root.add_child(document);
        let mut nested = Element::new("group");
        nested.add_child(Element::new("document"));
        root.add_child(nested);
        root
    }

    #[test]
    fn test_attribute_access() {
        let mut element = Element::new("document");
        element.set_attribute("title", "Example");
        assert_eq!(element.attribute("title"), Some("Example"));
        assert_eq!(element.attribute("missing"), None);
    }

    #[test]
    fn test_find_children() {
        let root = sample_tree();
        assert_eq!(root.find_children("document").len(), 1);
        assert_eq!(root.find_children("group").len(), 1);
    }

    #[test]
    fn test_descendants_document_order() {
        let root = sample_tree();
        let names: Vec<&str> = root.descendants().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["geolinks", "document", "file", "file", "group", "document"]
        );
    }

    #[test]
    fn test_descendants_named_any_depth() {
        let root = sample_tree();
        // One document at the top level, one nested inside a group.
        assert_eq!(root.descendants_named("document").count(), 2);
    }

    #[test]
    fn test_attribute_order_preserved() {
        let mut element = Element::new("document");
        element.set_attribute("b", "2");
        element.set_attribute("a", "1");
        let keys: Vec<&String> = element.attributes.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
