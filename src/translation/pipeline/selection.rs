//! 文本选区
//!
//! 选区限定在单个文本节点内，以字符偏移表示。

use markup5ever_rcdom::Handle;

use super::collector::TextCollector;
use super::node_ref::NodeRef;

/// 单个文本节点内的选区
#[derive(Debug, Clone)]
pub struct Selection {
    pub owner: NodeRef,
    /// 起始字符偏移（含）
    pub start: usize,
    /// 结束字符偏移（不含）
    pub end: usize,
}

impl Selection {
    /// 在 `owner` 节点中选中 `[start, end)` 字符区间
    pub fn new(owner: NodeRef, start: usize, end: usize) -> Self {
        Self { owner, start, end }
    }

    /// 按收集顺序查找第一个包含 `needle` 的可见文本节点并选中该处
    ///
    /// 与整页翻译使用同样的可见性规则，`<title>`、`<script>` 和隐藏元素中的文本不会被选中。
    pub fn find(root: &Handle, needle: &str) -> Option<Self> {
        if needle.is_empty() {
            return None;
        }

        TextCollector::new(0).units(root).find_map(|unit| {
            let byte_start = unit.original_value.find(needle)?;
            let start = unit.original_value[..byte_start].chars().count();
            let end = start + needle.chars().count();
            Some(Self::new(unit.owner, start, end))
        })
    }

    /// 选中的文本；节点失效或偏移越界时为空串
    pub fn text(&self) -> String {
        self.owner
            .text()
            .map(|text| {
                text.chars()
                    .skip(self.start)
                    .take(self.end.saturating_sub(self.start))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 用 `replacement` 替换选中内容，并把选区调整到新文本上
    pub fn replace_with(&mut self, replacement: &str) -> bool {
        let Some(current) = self.owner.text() else {
            return false;
        };

        let mut updated: String = current.chars().take(self.start).collect();
        updated.push_str(replacement);
        updated.extend(current.chars().skip(self.end));

        if !self.owner.set_text(&updated) {
            return false;
        }
        self.end = self.start + replacement.chars().count();
        true
    }
}
