use crate::app::uiauto::selector::Selector;

/// Pixel bounds of a node, `[left,top][right,bottom]` in the dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn center_x(&self) -> i32 {
        (self.left + self.right) / 2
    }

    pub fn center_y(&self) -> i32 {
        (self.top + self.bottom) / 2
    }
}

/// One element of a uiautomator hierarchy snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiNode {
    pub resource_id: String,
    pub package: String,
    pub class: String,
    pub text: String,
    pub content_desc: String,
    pub bounds: Bounds,
    pub children: Vec<UiNode>,
}

impl UiNode {
    pub fn matches(&self, selector: &Selector) -> bool {
        self.resource_id == selector.qualified_id()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Depth-first search for the first node matching the selector.
    pub fn find(&self, selector: &Selector) -> Option<&UiNode> {
        if self.matches(selector) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(selector))
    }
}

pub fn parse_bounds(value: &str) -> Option<Bounds> {
    let trimmed = value.trim();
    let inner = trimmed.strip_prefix('[')?.strip_suffix(']')?;
    let (first, second) = inner.split_once("][")?;
    let (left, top) = first.split_once(',')?;
    let (right, bottom) = second.split_once(',')?;
    Some(Bounds {
        left: left.trim().parse().ok()?,
        top: top.trim().parse().ok()?,
        right: right.trim().parse().ok()?,
        bottom: bottom.trim().parse().ok()?,
    })
}

fn take_attr(attrs: &mut Vec<(String, String)>, name: &str) -> String {
    attrs
        .iter()
        .position(|(attr_name, _)| attr_name == name)
        .map(|index| attrs.swap_remove(index).1)
        .unwrap_or_default()
}

fn unescape_xml(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Parses a `uiautomator dump` document into a node tree. The synthetic root
/// corresponds to the `<hierarchy>` wrapper; display content hangs off its
/// children. A byte-cursor scan is enough here: the dump is machine-written,
/// attribute values are always quoted, and there is no text content.
pub fn parse_hierarchy(xml: &str) -> Result<UiNode, String> {
    let bytes = xml.as_bytes();
    let mut index: usize = 0;
    let mut root = UiNode::default();
    // Indices into the tree under construction, root implicit at depth 0.
    let mut path: Vec<usize> = Vec::new();

    fn node_at<'a>(root: &'a mut UiNode, path: &[usize]) -> &'a mut UiNode {
        let mut current = root;
        for &child_index in path {
            current = &mut current.children[child_index];
        }
        current
    }

    while index < bytes.len() {
        if bytes[index] != b'<' {
            index += 1;
            continue;
        }
        if index + 1 >= bytes.len() {
            break;
        }
        match bytes[index + 1] {
            b'/' => {
                index += 2;
                while index < bytes.len() && bytes[index] != b'>' {
                    index += 1;
                }
                if index < bytes.len() {
                    index += 1;
                }
                path.pop();
            }
            b'!' => {
                index += 2;
                while index + 2 < bytes.len()
                    && !(bytes[index] == b'-'
                        && bytes[index + 1] == b'-'
                        && bytes[index + 2] == b'>')
                {
                    index += 1;
                }
                index = (index + 3).min(bytes.len());
            }
            b'?' => {
                index += 2;
                while index + 1 < bytes.len() && !(bytes[index] == b'?' && bytes[index + 1] == b'>')
                {
                    index += 1;
                }
                index = (index + 2).min(bytes.len());
            }
            _ => {
                let start = index + 1;
                let mut cursor = start;
                while cursor < bytes.len() {
                    let ch = bytes[cursor];
                    if ch == b'/' || ch == b'>' || ch.is_ascii_whitespace() {
                        break;
                    }
                    cursor += 1;
                }
                let tag_name = &xml[start..cursor];
                let mut attrs: Vec<(String, String)> = Vec::new();
                let mut self_closing = false;
                let mut attr_cursor = cursor;
                while attr_cursor < bytes.len() {
                    while attr_cursor < bytes.len() && bytes[attr_cursor].is_ascii_whitespace() {
                        attr_cursor += 1;
                    }
                    if attr_cursor >= bytes.len() {
                        break;
                    }
                    let ch = bytes[attr_cursor];
                    if ch == b'>' {
                        attr_cursor += 1;
                        break;
                    }
                    if ch == b'/' {
                        self_closing = true;
                        attr_cursor += 1;
                        if attr_cursor < bytes.len() && bytes[attr_cursor] == b'>' {
                            attr_cursor += 1;
                        }
                        break;
                    }

                    let name_start = attr_cursor;
                    while attr_cursor < bytes.len()
                        && bytes[attr_cursor] != b'='
                        && !bytes[attr_cursor].is_ascii_whitespace()
                    {
                        attr_cursor += 1;
                    }
                    if attr_cursor >= bytes.len() {
                        return Err("Malformed attribute".into());
                    }
                    let name_end = attr_cursor;
                    while attr_cursor < bytes.len() && bytes[attr_cursor].is_ascii_whitespace() {
                        attr_cursor += 1;
                    }
                    if attr_cursor >= bytes.len() || bytes[attr_cursor] != b'=' {
                        return Err("Malformed attribute assignment".into());
                    }
                    attr_cursor += 1;
                    while attr_cursor < bytes.len() && bytes[attr_cursor].is_ascii_whitespace() {
                        attr_cursor += 1;
                    }
                    if attr_cursor >= bytes.len() {
                        return Err("Missing attribute value".into());
                    }
                    let quote = bytes[attr_cursor];
                    if quote != b'"' && quote != b'\'' {
                        return Err("Attribute value must be quoted".into());
                    }
                    attr_cursor += 1;
                    let value_start = attr_cursor;
                    while attr_cursor < bytes.len() && bytes[attr_cursor] != quote {
                        attr_cursor += 1;
                    }
                    if attr_cursor >= bytes.len() {
                        return Err("Unterminated attribute value".into());
                    }
                    let value_end = attr_cursor;
                    attr_cursor += 1;
                    attrs.push((
                        xml[name_start..name_end].to_string(),
                        unescape_xml(&xml[value_start..value_end]),
                    ));
                }
                index = attr_cursor;

                if tag_name == "hierarchy" {
                    // Wrapper element maps onto the synthetic root; its close
                    // tag pops nothing because the root is not on the path.
                    continue;
                }

                let node = UiNode {
                    resource_id: take_attr(&mut attrs, "resource-id"),
                    package: take_attr(&mut attrs, "package"),
                    class: take_attr(&mut attrs, "class"),
                    text: take_attr(&mut attrs, "text"),
                    content_desc: take_attr(&mut attrs, "content-desc"),
                    bounds: parse_bounds(&take_attr(&mut attrs, "bounds")).unwrap_or_default(),
                    children: Vec::new(),
                };

                let parent = node_at(&mut root, &path);
                parent.children.push(node);
                if !self_closing {
                    path.push(parent.children.len() - 1);
                }
            }
        }
    }

    Ok(root)
}
