//! 文本节点的可撤销弱引用

use std::fmt;
use std::rc::{Rc, Weak};

use html5ever::tendril::StrTendril;
use markup5ever_rcdom::{Handle, Node, NodeData};

/// 指向 DOM 文本节点的不透明句柄
///
/// 只持有弱引用：文档被释放或句柄被撤销后，读写都会静默失败。
#[derive(Clone)]
pub struct NodeRef(Weak<Node>);

impl NodeRef {
    pub fn new(node: &Handle) -> Self {
        NodeRef(Rc::downgrade(node))
    }

    /// 节点是否仍然存活
    pub fn is_live(&self) -> bool {
        self.0.strong_count() > 0
    }

    fn upgrade(&self) -> Option<Handle> {
        self.0.upgrade()
    }

    /// 读取当前文本
    pub fn text(&self) -> Option<String> {
        let node = self.upgrade()?;
        match &node.data {
            NodeData::Text { contents } => Some(contents.borrow().to_string()),
            _ => None,
        }
    }

    /// 替换节点文本，节点已失效或不是文本节点时返回 `false`
    pub fn set_text(&self, value: &str) -> bool {
        let Some(node) = self.upgrade() else {
            return false;
        };
        match &node.data {
            NodeData::Text { contents } => {
                *contents.borrow_mut() = StrTendril::from_slice(value);
                true
            }
            _ => false,
        }
    }

    /// 撤销句柄，之后的写入全部失效
    pub fn revoke(&mut self) {
        self.0 = Weak::new();
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("live", &self.is_live())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::{find_nodes, html_to_dom};

    fn first_text(dom: &markup5ever_rcdom::RcDom) -> Handle {
        let p = find_nodes(&dom.document, &["html", "body", "p"])
            .into_iter()
            .next()
            .unwrap();
        let text = p.children.borrow()[0].clone();
        text
    }

    #[test]
    fn reads_and_writes_text() {
        let dom = html_to_dom(b"<p>Bonjour</p>", "utf-8").unwrap();
        let owner = NodeRef::new(&first_text(&dom));
        assert_eq!(owner.text().as_deref(), Some("Bonjour"));
        assert!(owner.set_text("Hello"));
        assert_eq!(owner.text().as_deref(), Some("Hello"));
    }

    #[test]
    fn dropped_document_revokes_owner() {
        let owner = {
            let dom = html_to_dom(b"<p>Bonjour</p>", "utf-8").unwrap();
            NodeRef::new(&first_text(&dom))
        };
        assert!(!owner.is_live());
        assert!(!owner.set_text("Hello"));
        assert_eq!(owner.text(), None);
    }

    #[test]
    fn explicit_revoke_blocks_writes() {
        let dom = html_to_dom(b"<p>Bonjour</p>", "utf-8").unwrap();
        let mut owner = NodeRef::new(&first_text(&dom));
        owner.revoke();
        assert!(!owner.set_text("Hello"));
        assert_eq!(
            crate::parsers::html::get_text(&first_text(&dom)).as_deref(),
            Some("Bonjour")
        );
    }
}
