//! Element Index — a navigable tree overlay over a flat `StructureDocument`
//! (spec §4.2).
//!
//! `StructureDocument` is a bag of categories; the element index reconstructs
//! the containment tree those items actually live in (a method inside a
//! class, a class inside a module) so callers can walk `parent`/`children`
//! and address an item by dotted path (`Foo.bar`) instead of by category.

use crate::structure::{Item, StructureDocument};
use rustc_hash::FxHashMap;

/// Containment-tie category priority (spec §9, Open Question (a)): when two
/// items share an identical interval, the one earlier in this list is the
/// outer (parent) element. Anything not listed sorts last.
const CATEGORY_PRIORITY: &[&str] = &[
    "classes", "interfaces", "types", "functions", "methods", "servers", "upstreams", "locations",
    "from", "run", "copy", "env", "imports", "headings", "frontmatter",
];

fn category_priority(category: &str) -> usize {
    CATEGORY_PRIORITY.iter().position(|c| *c == category).unwrap_or(CATEGORY_PRIORITY.len())
}

/// One node in the element tree: a category-tagged `Item` plus its position
/// in the containment hierarchy.
#[derive(Debug, Clone)]
pub struct Element {
    pub category: String,
    pub item: Item,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub path: String,
    pub depth: u32,
}

impl Element {
    /// `true` for Python methods: a function-category item nested directly
    /// under a class (spec §4.2, Python-specific enrichment).
    pub fn is_method(&self) -> bool {
        self.category == "methods"
    }

    pub fn is_staticmethod(&self) -> bool {
        self.item.decorators.iter().any(|d| d.trim_start_matches('@') == "staticmethod")
    }

    pub fn is_classmethod(&self) -> bool {
        self.item.decorators.iter().any(|d| d.trim_start_matches('@') == "classmethod")
    }

    pub fn is_property(&self) -> bool {
        self.item.decorators.iter().any(|d| d.trim_start_matches('@') == "property")
    }

    /// Human-facing category label: singularized and disambiguated for
    /// methods/staticmethods/properties rather than the raw bucket name.
    pub fn display_category(&self) -> &'static str {
        if self.is_property() {
            "property"
        } else if self.is_staticmethod() {
            "staticmethod"
        } else if self.is_classmethod() {
            "classmethod"
        } else if self.is_method() {
            "method"
        } else {
            match self.category.as_str() {
                "classes" => "class",
                "interfaces" => "interface",
                "types" => "type",
                "functions" => "function",
                "imports" => "import",
                "headings" => "heading",
                other => Box::leak(other.to_string().into_boxed_str()),
            }
        }
    }

    /// Signature with the return-type annotation trimmed off, for compact
    /// listings (`foo(a, b)` instead of `foo(a: int, b: str) -> bool`). For
    /// Python-like signatures (spec §4.2, Python-specific enrichments) this
    /// additionally drops `self`/`cls`, strips parameter type annotations,
    /// and truncates parameter lists of five or more with `…`.
    pub fn compact_signature(&self) -> Option<String> {
        let sig = self.item.signature.as_deref()?;
        let without_return = sig.split("->").next().unwrap_or(sig).trim_end();

        let Some((start, end)) = param_list_bounds(without_return) else {
            return Some(without_return.to_string());
        };
        let before = &without_return[..=start];
        let after = &without_return[end..];
        let mut params = split_top_level_commas(&without_return[start + 1..end]);

        if without_return.trim_start().starts_with("def ") {
            params.retain(|p| {
                let name = p.split(|c| c == ':' || c == '=').next().unwrap_or(p).trim();
                name != "self" && name != "cls"
            });
            let truncate = params.len() >= 5;
            let mut rendered: Vec<String> = params.iter().map(|p| strip_annotation(p)).collect();
            if truncate {
                rendered.truncate(4);
                rendered.push("…".to_string());
            }
            return Some(format!("{before}{}{after}", rendered.join(", ")));
        }

        Some(format!("{before}{}{after}", params.join(", ")))
    }

    /// The `-> T` / `: T` return-type annotation, if the signature has one.
    pub fn return_type(&self) -> Option<&str> {
        let sig = self.item.signature.as_deref()?;
        sig.split("->").nth(1).map(str::trim)
    }
}

/// Byte offsets of `(` and its matching `)` in a signature's parameter
/// list, tracked by paren depth only (generic `<>`/`[]` nesting inside a
/// parameter never changes paren depth, so this is safe for annotated
/// params like `items: Vec<(i32, i32)>`).
fn param_list_bounds(sig: &str) -> Option<(usize, usize)> {
    let start = sig.find('(')?;
    let mut depth = 0i32;
    for (i, b) in sig.bytes().enumerate().skip(start) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((start, i));
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a parameter list on top-level commas, respecting nested
/// `()`/`[]`/`<>`/`{}` so a default value like `x=(1, 2)` isn't split.
fn split_top_level_commas(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for c in s.chars() {
        match c {
            '(' | '[' | '<' | '{' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' | '>' | '}' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

/// Drop a `name: Type` annotation, keeping the parameter name and any
/// default value (`name: Type = default` -> `name=default`).
fn strip_annotation(param: &str) -> String {
    let mut depth = 0i32;
    let mut colon_idx = None;
    for (i, c) in param.char_indices() {
        match c {
            '(' | '[' | '<' | '{' => depth += 1,
            ')' | ']' | '>' | '}' => depth -= 1,
            ':' if depth == 0 && colon_idx.is_none() => colon_idx = Some(i),
            _ => {}
        }
    }
    let Some(idx) = colon_idx else { return param.trim().to_string() };
    let name = param[..idx].trim();
    match top_level_eq(&param[idx + 1..]) {
        Some(eq_idx) => format!("{name}={}", param[idx + 1 + eq_idx + 1..].trim()),
        None => name.to_string(),
    }
}

/// Byte offset of an assignment `=` at paren/bracket depth 0, excluding
/// `==`/`!=`/`<=`/`>=` comparison operators.
fn top_level_eq(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0i32;
    for i in 0..bytes.len() {
        match bytes[i] {
            b'(' | b'[' | b'<' | b'{' => depth += 1,
            b')' | b']' | b'>' | b'}' => depth -= 1,
            b'=' if depth == 0 => {
                let prev = if i > 0 { Some(bytes[i - 1]) } else { None };
                let next = bytes.get(i + 1).copied();
                if !matches!(prev, Some(b'!') | Some(b'<') | Some(b'>') | Some(b'=')) && next != Some(b'=') {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// The containment tree built over one `StructureDocument`.
pub struct ElementIndex {
    elements: Vec<Element>,
    roots: Vec<usize>,
}

fn interval_of(item: &Item) -> (usize, usize) {
    item.byte_range.unwrap_or((item.line as usize, item.line_end as usize))
}

impl ElementIndex {
    /// Build the tree from `doc`'s flat category lists. Containment is
    /// decided by byte interval when available (grammar/Markdown items),
    /// falling back to the line range otherwise (config-format items).
    pub fn build(doc: &StructureDocument) -> Self {
        let mut entries: Vec<(String, Item)> =
            doc.all_items().map(|(cat, item)| (cat.to_string(), item.clone())).collect();

        entries.sort_by(|(cat_a, a), (cat_b, b)| {
            let (start_a, end_a) = interval_of(a);
            let (start_b, end_b) = interval_of(b);
            start_a
                .cmp(&start_b)
                .then(end_b.cmp(&end_a))
                .then(category_priority(cat_a).cmp(&category_priority(cat_b)))
        });

        let mut elements: Vec<Element> = entries
            .into_iter()
            .map(|(category, item)| Element { category, item, parent: None, children: Vec::new(), path: String::new(), depth: 0 })
            .collect();

        let mut roots = Vec::new();
        let mut stack: Vec<usize> = Vec::new();

        for idx in 0..elements.len() {
            let (start, end) = interval_of(&elements[idx].item);
            while let Some(&top) = stack.last() {
                let (top_start, top_end) = interval_of(&elements[top].item);
                let strictly_contains = top_start <= start && end <= top_end && (top_start, top_end) != (start, end);
                let identical_tie_already_claimed = (top_start, top_end) == (start, end);
                if strictly_contains || identical_tie_already_claimed {
                    break;
                }
                stack.pop();
            }

            match stack.last() {
                Some(&parent) => {
                    elements[idx].parent = Some(parent);
                    elements[idx].depth = elements[parent].depth + 1;
                    elements[parent].children.push(idx);
                }
                None => roots.push(idx),
            }
            stack.push(idx);
        }

        let mut index = Self { elements, roots };
        for root in index.roots.clone() {
            index.assign_paths(root, String::new());
        }
        index
    }

    fn assign_paths(&mut self, id: usize, parent_path: String) {
        let joiner = if self.elements[id].category == "headings" { "/" } else { "." };
        let path = if parent_path.is_empty() {
            self.elements[id].item.name.clone()
        } else {
            format!("{parent_path}{joiner}{}", self.elements[id].item.name)
        };
        self.elements[id].path = path.clone();
        for child in self.elements[id].children.clone() {
            self.assign_paths(child, path.clone());
        }
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn get(&self, id: usize) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn parent(&self, id: usize) -> Option<&Element> {
        self.elements.get(id)?.parent.and_then(|p| self.elements.get(p))
    }

    pub fn children(&self, id: usize) -> &[usize] {
        self.elements.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Depth-first walk of every element in the tree, roots first.
    pub fn walk(&self) -> impl Iterator<Item = &Element> {
        let mut order = Vec::with_capacity(self.elements.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.elements[id].children.iter().rev().copied());
        }
        order.into_iter().map(move |id| &self.elements[id])
    }

    pub fn find(&self, mut predicate: impl FnMut(&Element) -> bool) -> Option<&Element> {
        self.walk().find(|e| predicate(e))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Element> {
        self.find(|e| e.item.name == name || e.path == name)
    }

    pub fn find_by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Element> {
        self.walk().filter(move |e| e.category == category)
    }

    pub fn by_path(&self) -> FxHashMap<String, usize> {
        self.elements.iter().enumerate().map(|(id, e)| (e.path.clone(), id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::grammar::GrammarLanguage;
    use crate::structure::extractors::treesitter;

    #[test]
    fn methods_nest_under_their_class() {
        let source = "class Foo:\n    def bar(self):\n        pass\n";
        let doc = treesitter::extract(source, GrammarLanguage::Python).unwrap();
        let index = ElementIndex::build(&doc);
        let bar = index.find_by_name("bar").unwrap();
        assert_eq!(bar.depth, 1);
        assert_eq!(bar.path, "Foo.bar");
        assert_eq!(index.parent(index.by_path()["Foo.bar"]).unwrap().item.name, "Foo");
    }

    #[test]
    fn class_and_functions_are_roots_when_disjoint() {
        let source = "fn a() {}\nfn b() {}\n";
        let doc = treesitter::extract(source, GrammarLanguage::Rust).unwrap();
        let index = ElementIndex::build(&doc);
        assert_eq!(index.roots().len(), 2);
        assert!(index.walk().all(|e| e.depth == 0));
    }

    #[test]
    fn path_uses_slash_for_headings() {
        let doc = crate::structure::extractors::markdown::extract("# Title\n\n## Sub\n").unwrap();
        let index = ElementIndex::build(&doc);
        let sub = index.find_by_name("Sub").unwrap();
        assert_eq!(sub.path, "Title/Sub");
    }

    #[test]
    fn compact_signature_strips_return_type() {
        let source = "fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n";
        let doc = treesitter::extract(source, GrammarLanguage::Rust).unwrap();
        let index = ElementIndex::build(&doc);
        let add = index.find_by_name("add").unwrap();
        assert_eq!(add.return_type(), Some("i32"));
        assert!(!add.compact_signature().unwrap().contains("->"));
    }

    #[test]
    fn compact_signature_drops_self_and_strips_annotations_for_python() {
        let source = "class Foo:\n    def bar(self, a: int, b: str = \"x\") -> bool:\n        return True\n";
        let doc = treesitter::extract(source, GrammarLanguage::Python).unwrap();
        let index = ElementIndex::build(&doc);
        let bar = index.find_by_name("bar").unwrap();
        let sig = bar.compact_signature().unwrap();
        assert_eq!(sig, "def bar(a, b=\"x\")");
    }

    #[test]
    fn compact_signature_truncates_five_or_more_python_params() {
        let source = "def f(a: int, b: int, c: int, d: int, e: int) -> None:\n    pass\n";
        let doc = treesitter::extract(source, GrammarLanguage::Python).unwrap();
        let index = ElementIndex::build(&doc);
        let f = index.find_by_name("f").unwrap();
        let sig = f.compact_signature().unwrap();
        assert_eq!(sig, "def f(a, b, c, d, …)");
    }
}
