//! 文本收集器模块
//!
//! 以深度优先前序遍历 DOM，惰性产出可翻译的 [`TextUnit`]。
//!
//! 一个文本节点可被收集，当且仅当：
//!
//! - 最近的元素祖先不是 `script`/`style`
//! - 没有祖先是永不渲染的元素（`head`、`template` 等），带 `hidden` 属性，
//!   或内联样式声明了 `display: none` / `visibility: hidden`
//! - 去掉首尾空白后的字符数严格大于最小长度

use std::iter::FusedIterator;
use std::sync::OnceLock;

use markup5ever_rcdom::{Handle, NodeData};
use regex::Regex;

use super::node_ref::NodeRef;
use crate::parsers::html::{get_body, get_node_attr, get_node_name, get_parent_node, has_node_attr};
use crate::translation::config::{constants, TranslationConfig};

/// 一个待翻译的文本片段
#[derive(Debug, Clone)]
pub struct TextUnit {
    /// 所属文本节点
    pub owner: NodeRef,
    /// 收集时的原始文本（未裁剪）
    pub original_value: String,
    /// 在遍历顺序中的位置，从 0 开始
    pub position: usize,
}

impl TextUnit {
    /// 字符数
    pub fn char_count(&self) -> usize {
        self.original_value.chars().count()
    }
}

/// 收集统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub nodes_visited: usize,
    pub subtrees_pruned: usize,
    pub text_nodes_found: usize,
    pub skipped_by_ancestor: usize,
    pub filtered_by_length: usize,
    pub collected: usize,
}

impl CollectionStats {
    /// 总过滤数
    pub fn total_filtered(&self) -> usize {
        self.skipped_by_ancestor + self.filtered_by_length
    }
}

/// 文本收集器
#[derive(Debug, Clone)]
pub struct TextCollector {
    min_text_length: usize,
}

impl Default for TextCollector {
    fn default() -> Self {
        Self::new(constants::MIN_TEXT_LENGTH)
    }
}

impl TextCollector {
    pub fn new(min_text_length: usize) -> Self {
        Self { min_text_length }
    }

    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(config.min_text_length)
    }

    /// 从 `root` 开始惰性收集文本单元
    ///
    /// `root` 是文档节点时从 `<body>` 开始遍历。
    pub fn units(&self, root: &Handle) -> TextUnits {
        let start = match root.data {
            NodeData::Document => get_body(root).unwrap_or_else(|| root.clone()),
            _ => root.clone(),
        };
        let in_raw_text = get_parent_node(&start)
            .as_ref()
            .and_then(|parent| get_node_name(parent))
            .map_or(false, is_raw_text_element);

        TextUnits {
            stack: vec![Frame {
                node: start,
                in_raw_text,
            }],
            min_text_length: self.min_text_length,
            position: 0,
            stats: CollectionStats::default(),
            finished: false,
        }
    }

    /// 一次性收集全部文本单元
    pub fn collect_all(&self, root: &Handle) -> (Vec<TextUnit>, CollectionStats) {
        let mut units = self.units(root);
        let collected: Vec<TextUnit> = units.by_ref().collect();
        (collected, units.stats)
    }
}

struct Frame {
    node: Handle,
    /// 最近的元素祖先是否为 script/style
    in_raw_text: bool,
}

/// 惰性文本单元迭代器，只能遍历一次
pub struct TextUnits {
    stack: Vec<Frame>,
    min_text_length: usize,
    position: usize,
    stats: CollectionStats,
    finished: bool,
}

impl TextUnits {
    fn push_children(&mut self, node: &Handle, in_raw_text: bool) {
        for child in node.children.borrow().iter().rev() {
            self.stack.push(Frame {
                node: child.clone(),
                in_raw_text,
            });
        }
    }

    fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            tracing::debug!(
                "文本收集完成: 访问 {} 个节点, 剪枝 {} 棵子树, 发现 {} 个文本节点, 收集 {} 个, 过滤 {} 个",
                self.stats.nodes_visited,
                self.stats.subtrees_pruned,
                self.stats.text_nodes_found,
                self.stats.collected,
                self.stats.total_filtered()
            );
        }
    }
}

impl Iterator for TextUnits {
    type Item = TextUnit;

    fn next(&mut self) -> Option<TextUnit> {
        while let Some(Frame { node, in_raw_text }) = self.stack.pop() {
            self.stats.nodes_visited += 1;

            match &node.data {
                NodeData::Document => self.push_children(&node, false),
                NodeData::Element { name, .. } => {
                    let tag = name.local.as_ref();
                    if is_never_rendered(tag) || is_hidden(&node) {
                        self.stats.subtrees_pruned += 1;
                        continue;
                    }
                    self.push_children(&node, is_raw_text_element(tag));
                }
                NodeData::Text { contents } => {
                    self.stats.text_nodes_found += 1;
                    if in_raw_text {
                        self.stats.skipped_by_ancestor += 1;
                        continue;
                    }

                    let value = contents.borrow().to_string();
                    if value.trim().chars().count() <= self.min_text_length {
                        self.stats.filtered_by_length += 1;
                        continue;
                    }

                    let unit = TextUnit {
                        owner: NodeRef::new(&node),
                        original_value: value,
                        position: self.position,
                    };
                    self.position += 1;
                    self.stats.collected += 1;
                    return Some(unit);
                }
                _ => {}
            }
        }

        self.finish();
        None
    }
}

impl FusedIterator for TextUnits {}

fn is_raw_text_element(tag: &str) -> bool {
    constants::SKIP_PARENT_ELEMENTS.contains(&tag)
}

fn is_never_rendered(tag: &str) -> bool {
    constants::NEVER_RENDERED_ELEMENTS.contains(&tag)
}

fn hidden_style_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|;)\s*(?:display\s*:\s*none|visibility\s*:\s*hidden)\s*(?:!important)?\s*(?:;|$)")
            .ok()
    })
    .as_ref()
}

/// 元素是否在静态层面不可见
fn is_hidden(node: &Handle) -> bool {
    if has_node_attr(node, "hidden") {
        return true;
    }

    match get_node_attr(node, "style") {
        Some(style) => {
            hidden_style_regex().map_or(false, |re| re.is_match(&style.to_lowercase()))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::html_to_dom;

    fn collect(html: &str) -> Vec<String> {
        let dom = html_to_dom(html.as_bytes(), "utf-8").unwrap();
        TextCollector::default()
            .units(&dom.document)
            .map(|unit| unit.original_value)
            .collect()
    }

    #[test]
    fn collects_in_document_order() {
        let texts = collect(
            "<html><body><h1>Bonjour le monde</h1><div><p>Guten Morgen</p><p>Buenos días</p></div></body></html>",
        );
        assert_eq!(texts, vec!["Bonjour le monde", "Guten Morgen", "Buenos días"]);
    }

    #[test]
    fn skips_script_and_style_text() {
        let texts = collect(
            "<body><script>var greeting = 'bonjour';</script><style>body { color: red; }</style><p>Texte visible</p></body>",
        );
        assert_eq!(texts, vec!["Texte visible"]);
    }

    #[test]
    fn skips_short_and_whitespace_text() {
        let texts = collect("<body><p>Salut</p><p>     </p><p>  Bonjour!  </p></body>");
        // "Salut" a exactement 5 caractères
        assert_eq!(texts, vec!["  Bonjour!  "]);
    }

    #[test]
    fn prunes_hidden_subtrees() {
        let texts = collect(concat!(
            "<body>",
            "<div hidden><p>Caché par attribut</p></div>",
            "<div style=\"color: red; DISPLAY: none\"><p>Caché par style</p></div>",
            "<span style=\"visibility:hidden\">Invisible aussi</span>",
            "<template><p>Dans un modèle</p></template>",
            "<noscript><p>Sans JavaScript</p></noscript>",
            "<p style=\"display: block\">Affiché normalement</p>",
            "</body>",
        ));
        assert_eq!(texts, vec!["Affiché normalement"]);
    }

    #[test]
    fn ignores_head_content() {
        let texts = collect(
            "<html><head><title>Titre de la page</title></head><body><p>Corps du texte</p></body></html>",
        );
        assert_eq!(texts, vec!["Corps du texte"]);
    }

    #[test]
    fn positions_count_collected_units() {
        let dom = html_to_dom(
            b"<body><p>Premier texte</p><p>x</p><p>Second texte</p></body>",
            "utf-8",
        )
        .unwrap();
        let units: Vec<TextUnit> = TextCollector::default().units(&dom.document).collect();
        assert_eq!(
            units.iter().map(|u| u.position).collect::<Vec<_>>(),
            vec![0, 1]
        );
    }

    #[test]
    fn stats_track_filtering() {
        let dom = html_to_dom(
            b"<body><script>console.log('x')</script><p>tiny</p><p>Assez long</p></body>",
            "utf-8",
        )
        .unwrap();
        let (units, stats) = TextCollector::default().collect_all(&dom.document);
        assert_eq!(units.len(), 1);
        assert_eq!(stats.collected, 1);
        assert_eq!(stats.skipped_by_ancestor, 1);
        assert_eq!(stats.filtered_by_length, 1);
    }

    #[test]
    fn iterator_is_fused_after_exhaustion() {
        let dom = html_to_dom(b"<body><p>Un seul texte</p></body>", "utf-8").unwrap();
        let mut units = TextCollector::default().units(&dom.document);
        assert!(units.next().is_some());
        assert!(units.next().is_none());
        assert!(units.next().is_none());
    }

    #[test]
    fn subtree_root_inside_script_is_skipped() {
        let dom = html_to_dom(b"<body><script>let a = 'texte long';</script></body>", "utf-8").unwrap();
        let script = crate::parsers::html::find_nodes(&dom.document, &["script"])
            .into_iter()
            .next()
            .unwrap();
        let text = script.children.borrow()[0].clone();
        assert_eq!(TextCollector::default().units(&text).count(), 0);
    }
}
