//! 交互式提示与告警

use std::io::{self, BufRead, Write};

use crate::translation::config::GeminiModel;
use crate::translation::error::TranslationResult;
use crate::translation::storage::{ensure_api_key, SettingsStore};

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// 从输入流读取回答，向输出流写提示
pub struct Prompter<R, W> {
    input: R,
    output: W,
    colors: bool,
}

impl Prompter<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr(), crate::core::use_colors())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, colors: bool) -> Self {
        Self {
            input,
            output,
            colors,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// 询问 API Key，空输入或输入结束视为拒绝
    pub fn ask_api_key(&mut self) -> io::Result<Option<String>> {
        write!(self.output, "Please enter your Google Gemini API Key: ")?;
        self.output.flush()?;
        let answer = self.read_line()?.filter(|key| !key.is_empty());
        if answer.is_none() {
            writeln!(self.output)?;
        }
        Ok(answer)
    }

    /// 存储中没有 Key 时询问并保存，写入成功后才确认
    pub fn request_api_key<S>(&mut self, store: &S) -> TranslationResult<String>
    where
        S: SettingsStore + ?Sized,
    {
        let mut prompted = false;
        let api_key = ensure_api_key(store, || {
            prompted = true;
            self.ask_api_key().ok().flatten()
        })?;

        if prompted {
            writeln!(
                self.output,
                "API Key saved. You can now use the translation commands."
            )?;
        }
        Ok(api_key)
    }

    /// 以红色输出告警
    pub fn alert(&mut self, message: &str) -> io::Result<()> {
        if self.colors {
            writeln!(self.output, "{ANSI_COLOR_RED}{message}{ANSI_COLOR_RESET}")
        } else {
            writeln!(self.output, "{message}")
        }
    }

    /// 列出模型并读取选择；回车保留当前模型
    ///
    /// 接受序号或模型标识。
    pub fn choose_model(&mut self, current: GeminiModel) -> io::Result<Option<GeminiModel>> {
        writeln!(self.output, "Translator Settings")?;
        write_model_list(&mut self.output, current)?;
        write!(self.output, "Translation Model [{}]: ", current)?;
        self.output.flush()?;

        let Some(answer) = self.read_line()? else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(Some(current));
        }

        let chosen = match answer.parse::<usize>() {
            Ok(index) if (1..=GeminiModel::ALL.len()).contains(&index) => {
                Some(GeminiModel::ALL[index - 1])
            }
            Ok(_) => None,
            Err(_) => answer.parse::<GeminiModel>().ok(),
        };

        if chosen.is_none() {
            self.alert(&format!("Unknown model: {answer}"))?;
        }
        Ok(chosen)
    }
}

/// 列出所有模型，`*` 标记当前模型
pub fn write_model_list<W: Write>(output: &mut W, current: GeminiModel) -> io::Result<()> {
    for (index, model) in GeminiModel::ALL.iter().enumerate() {
        let marker = if *model == current { '*' } else { ' ' };
        writeln!(output, "{marker} {}. {}", index + 1, model)?;
    }
    Ok(())
}
