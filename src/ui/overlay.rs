//! 终端进度覆盖层
//!
//! 在 stderr 的同一行上刷新状态文本，结束时清掉该行。

use std::cell::{Cell, RefCell};
use std::io::{self, Write};

use crate::translation::core::ProgressSink;

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";
const ANSI_CLEAR_LINE: &str = "\x1b[2K";

pub struct TerminalOverlay<W: Write = io::Stderr> {
    writer: RefCell<W>,
    colors: bool,
    visible: Cell<bool>,
}

impl TerminalOverlay<io::Stderr> {
    /// 写到 stderr，仅在终端且未设置 `NO_COLOR` 时使用 ANSI
    pub fn stderr() -> Self {
        Self::new(io::stderr(), crate::core::use_colors())
    }
}

impl<W: Write> TerminalOverlay<W> {
    pub fn new(writer: W, colors: bool) -> Self {
        Self {
            writer: RefCell::new(writer),
            colors,
            visible: Cell::new(false),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_line(&self, message: &str) -> io::Result<()> {
        let mut writer = self.writer.borrow_mut();
        if self.colors {
            write!(writer, "\r{ANSI_CLEAR_LINE}{ANSI_BOLD}{message}{ANSI_RESET}")?;
        } else {
            write!(writer, "\r{message}")?;
        }
        writer.flush()
    }

    fn clear_line(&self) -> io::Result<()> {
        let mut writer = self.writer.borrow_mut();
        if self.colors {
            write!(writer, "\r{ANSI_CLEAR_LINE}")?;
        } else {
            writeln!(writer)?;
        }
        writer.flush()
    }
}

impl<W: Write> ProgressSink for TerminalOverlay<W> {
    fn show(&self, message: &str) {
        // 进度输出失败不影响翻译
        if let Err(e) = self.write_line(message) {
            tracing::debug!("无法输出进度: {}", e);
        }
        self.visible.set(true);
    }

    fn hide(&self) {
        if !self.visible.replace(false) {
            return;
        }
        if let Err(e) = self.clear_line() {
            tracing::debug!("无法清除进度: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::core::Progress;

    #[test]
    fn plain_output_rewrites_one_line() {
        let overlay = TerminalOverlay::new(Vec::new(), false);
        overlay.update(Progress::new(0, 4));
        overlay.update(Progress::new(2, 4));
        overlay.hide();
        let output = String::from_utf8(overlay.into_inner()).unwrap();
        assert_eq!(output, "\rTranslating... (0%)\rTranslating... (50%)\n");
    }

    #[test]
    fn colored_output_uses_ansi() {
        let overlay = TerminalOverlay::new(Vec::new(), true);
        overlay.show("Translating selection...");
        assert!(overlay.is_visible());
        overlay.hide();
        assert!(!overlay.is_visible());
        let output = String::from_utf8(overlay.into_inner()).unwrap();
        assert!(output.contains("\x1b[1mTranslating selection...\x1b[0m"));
        assert!(output.ends_with("\r\x1b[2K"));
    }

    #[test]
    fn hide_without_show_writes_nothing() {
        let overlay = TerminalOverlay::new(Vec::new(), false);
        overlay.hide();
        assert!(overlay.into_inner().is_empty());
    }
}
