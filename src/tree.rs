use super::*;

const FOCUSABLE_TAGS: [&str; 7] = ["a", "button", "input", "select", "textarea", "iframe", "area"];
const FORM_CONTROL_TAGS: [&str; 5] = ["button", "input", "select", "textarea", "option"];
const MOUSE_EVENT_TYPES: [&str; 5] = ["click", "dblclick", "mousedown", "mouseup", "contextmenu"];
const FOCUS_EVENT_TYPES: [&str; 4] = ["focus", "blur", "focusin", "focusout"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Window,
    Document,
    Element(String),
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<TargetId>,
    children: Vec<TargetId>,
    kind: NodeKind,
    id_attr: Option<String>,
    disabled: bool,
    tab_index: Option<i32>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            kind,
            id_attr: None,
            disabled: false,
            tab_index: None,
        }
    }
}

/// Minimal arena tree standing in for a page's DOM: a window, one document
/// and whatever nodes a test builds. Mutation goes through `&self` so that
/// listeners holding an `Rc<NodeTree>` can attach and detach nodes while an
/// event is being dispatched.
#[derive(Debug)]
pub struct NodeTree {
    nodes: RefCell<Vec<NodeData>>,
    window: TargetId,
    document: TargetId,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    pub fn new() -> Self {
        let nodes = vec![
            NodeData::new(NodeKind::Window),
            NodeData::new(NodeKind::Document),
        ];
        Self {
            nodes: RefCell::new(nodes),
            window: TargetId(0),
            document: TargetId(1),
        }
    }

    pub fn window(&self) -> TargetId {
        self.window
    }

    pub fn document(&self) -> TargetId {
        self.document
    }

    pub fn contains(&self, node: TargetId) -> bool {
        node.0 < self.nodes.borrow().len()
    }

    fn push(&self, kind: NodeKind) -> TargetId {
        let mut nodes = self.nodes.borrow_mut();
        let id = TargetId(nodes.len());
        nodes.push(NodeData::new(kind));
        id
    }

    /// Creates a detached element.
    pub fn create_element(&self, tag_name: &str) -> TargetId {
        self.push(NodeKind::Element(tag_name.to_ascii_lowercase()))
    }

    pub fn create_text(&self, text: &str) -> TargetId {
        self.push(NodeKind::Text(text.to_string()))
    }

    /// Creates an element and appends it to `parent`.
    pub fn append_element(&self, parent: TargetId, tag_name: &str) -> Result<TargetId> {
        let node = self.create_element(tag_name);
        self.append_child(parent, node)?;
        Ok(node)
    }

    fn check_known(&self, node: TargetId) -> Result<()> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(Error::UnknownTarget(node.to_string()))
        }
    }

    pub fn append_child(&self, parent: TargetId, child: TargetId) -> Result<()> {
        self.check_known(parent)?;
        self.check_known(child)?;
        if child == self.window || parent == self.window {
            return Err(Error::InvalidTree("the window cannot be part of the node tree".into()));
        }
        if child == self.document {
            return Err(Error::InvalidTree("the document cannot be re-parented".into()));
        }
        if matches!(self.kind(parent), Some(NodeKind::Text(_))) {
            return Err(Error::InvalidTree("text nodes cannot have children".into()));
        }
        if parent == child || self.is_inclusive_ancestor(child, parent) {
            return Err(Error::InvalidTree(format!(
                "{} cannot be appended to its own descendant {}",
                self.describe(child),
                self.describe(parent)
            )));
        }

        self.detach(child)?;
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Removes `node` from its parent; a no-op for already detached nodes.
    pub fn detach(&self, node: TargetId) -> Result<()> {
        self.check_known(node)?;
        let mut nodes = self.nodes.borrow_mut();
        let Some(parent) = nodes[node.0].parent.take() else {
            return Ok(());
        };
        nodes[parent.0].children.retain(|child| *child != node);
        Ok(())
    }

    pub fn parent(&self, node: TargetId) -> Option<TargetId> {
        self.nodes.borrow().get(node.0).and_then(|data| data.parent)
    }

    pub fn children(&self, node: TargetId) -> Vec<TargetId> {
        self.nodes
            .borrow()
            .get(node.0)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    pub fn kind(&self, node: TargetId) -> Option<NodeKind> {
        self.nodes.borrow().get(node.0).map(|data| data.kind.clone())
    }

    pub fn tag_name(&self, node: TargetId) -> Option<String> {
        match self.kind(node)? {
            NodeKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: TargetId, node: TargetId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = nodes.get(current.0).and_then(|data| data.parent);
        }
        false
    }

    pub fn is_connected(&self, node: TargetId) -> bool {
        self.is_inclusive_ancestor(self.document, node)
    }

    pub fn set_id(&self, node: TargetId, id: &str) -> Result<()> {
        self.check_known(node)?;
        self.nodes.borrow_mut()[node.0].id_attr = Some(id.to_string());
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> Option<TargetId> {
        self.nodes
            .borrow()
            .iter()
            .position(|data| data.id_attr.as_deref() == Some(id))
            .map(TargetId)
    }

    pub fn set_disabled(&self, node: TargetId, disabled: bool) -> Result<()> {
        self.check_known(node)?;
        self.nodes.borrow_mut()[node.0].disabled = disabled;
        Ok(())
    }

    pub fn set_tab_index(&self, node: TargetId, tab_index: Option<i32>) -> Result<()> {
        self.check_known(node)?;
        self.nodes.borrow_mut()[node.0].tab_index = tab_index;
        Ok(())
    }

    fn is_disabled_control(&self, data: &NodeData) -> bool {
        match &data.kind {
            NodeKind::Element(tag) => data.disabled && FORM_CONTROL_TAGS.contains(&tag.as_str()),
            _ => false,
        }
    }

    fn is_focusable(&self, data: &NodeData) -> bool {
        match &data.kind {
            NodeKind::Window | NodeKind::Document => true,
            NodeKind::Text(_) => false,
            NodeKind::Element(tag) => {
                if self.is_disabled_control(data) {
                    return false;
                }
                data.tab_index.is_some() || FOCUSABLE_TAGS.contains(&tag.as_str()) || tag == "body"
            }
        }
    }
}

impl EventTree for NodeTree {
    fn parent_of(&self, node: TargetId) -> Option<TargetId> {
        self.parent(node)
    }

    fn is_document_root(&self, node: TargetId) -> bool {
        node == self.document
    }

    fn handles(&self, node: TargetId, event_type: &str) -> bool {
        let nodes = self.nodes.borrow();
        let Some(data) = nodes.get(node.0) else {
            return false;
        };
        let event_type = event_type.to_ascii_lowercase();
        if FOCUS_EVENT_TYPES.contains(&event_type.as_str()) {
            return self.is_focusable(data);
        }
        if MOUSE_EVENT_TYPES.contains(&event_type.as_str()) {
            return !self.is_disabled_control(data);
        }
        true
    }

    fn is_body(&self, node: TargetId) -> bool {
        self.tag_name(node).is_some_and(|tag| tag == "body")
    }

    fn describe(&self, node: TargetId) -> String {
        let nodes = self.nodes.borrow();
        let Some(data) = nodes.get(node.0) else {
            return format!("node-{}", node.0);
        };
        if let Some(id) = data.id_attr.as_deref().filter(|id| !id.is_empty()) {
            return format!("#{id}");
        }
        match &data.kind {
            NodeKind::Window => "window".into(),
            NodeKind::Document => "document".into(),
            NodeKind::Element(tag) => tag.clone(),
            NodeKind::Text(_) => "#text".into(),
        }
    }
}
