//! HTML解析和处理模块
//!
//! - `dom`: 基础DOM操作
//! - `metadata`: 文档元数据处理（字符编码、标题）
//! - `serializer`: 序列化功能

pub mod dom;
pub mod metadata;
pub mod serializer;

pub use dom::{
    find_nodes, get_body, get_child_node_by_name, get_node_attr, get_node_name, get_parent_node,
    get_text, has_node_attr, html_to_dom,
};
pub use metadata::{get_charset, get_title, parse_content_type};
pub use serializer::serialize_document;
