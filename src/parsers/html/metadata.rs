//! HTML 文档元数据处理模块
//!
//! 提供读取文档字符编码声明和标题的功能。字符编码用于在翻译前正确解码
//! 文档、翻译后按原编码写回；标题用于输出路径中的 `%title%` 占位符。

use markup5ever_rcdom::{Handle, NodeData};

use super::dom::{find_nodes, get_node_attr};

/// 解析 Content-Type 值
///
/// 返回 `(媒体类型, 字符编码)`，两者都可能为空字符串。
pub fn parse_content_type(content_type: &str) -> (String, String) {
    let mut parts = content_type.split(';');

    let media_type = parts
        .next()
        .map(|part| part.trim().to_lowercase())
        .unwrap_or_default();

    let charset = parts
        .map(str::trim)
        .find_map(|part| {
            part.split_once('=')
                .filter(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
                .map(|(_, value)| value.trim().trim_matches('"').to_string())
        })
        .unwrap_or_default();

    (media_type, charset)
}

/// 获取文档字符编码
///
/// 支持两种声明格式：
/// 1. HTML5 格式：`<meta charset="utf-8">`
/// 2. HTML4 格式：`<meta http-equiv="content-type" content="text/html; charset=utf-8">`
pub fn get_charset(node: &Handle) -> Option<String> {
    for meta_node in find_nodes(node, &["html", "head", "meta"]).iter() {
        if let Some(charset) = get_node_attr(meta_node, "charset") {
            return Some(charset);
        }

        if get_node_attr(meta_node, "http-equiv")
            .unwrap_or_default()
            .eq_ignore_ascii_case("content-type")
        {
            if let Some(content) = get_node_attr(meta_node, "content") {
                let (_media_type, charset) = parse_content_type(&content);
                if !charset.is_empty() {
                    return Some(charset);
                }
            }
        }
    }

    None
}

/// 获取文档标题
pub fn get_title(node: &Handle) -> Option<String> {
    for title_node in find_nodes(node, &["html", "head", "title"]).iter() {
        for child_node in title_node.children.borrow().iter() {
            if let NodeData::Text { ref contents } = child_node.data {
                return Some(contents.borrow().to_string());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::html_to_dom;

    #[test]
    fn charset_from_html5_meta() {
        let dom = html_to_dom(
            b"<html><head><meta charset=\"windows-1252\"></head><body></body></html>",
            "utf-8",
        )
        .unwrap();
        assert_eq!(get_charset(&dom.document).as_deref(), Some("windows-1252"));
    }

    #[test]
    fn charset_from_http_equiv() {
        let dom = html_to_dom(
            b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=ISO-8859-1\"></head></html>",
            "utf-8",
        )
        .unwrap();
        assert_eq!(get_charset(&dom.document).as_deref(), Some("ISO-8859-1"));
    }

    #[test]
    fn no_charset_declared() {
        let dom = html_to_dom(b"<p>Hola mundo</p>", "utf-8").unwrap();
        assert_eq!(get_charset(&dom.document), None);
    }

    #[test]
    fn content_type_parsing() {
        assert_eq!(
            parse_content_type("text/html; charset=\"utf-8\""),
            ("text/html".to_string(), "utf-8".to_string())
        );
        assert_eq!(
            parse_content_type("TEXT/HTML"),
            ("text/html".to_string(), String::new())
        );
    }

    #[test]
    fn title_lookup() {
        let dom = html_to_dom(
            b"<html><head><title>Guten Tag</title></head><body></body></html>",
            "utf-8",
        )
        .unwrap();
        assert_eq!(get_title(&dom.document).as_deref(), Some("Guten Tag"));
    }
}
