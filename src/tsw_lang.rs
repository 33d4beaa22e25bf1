// Multi-language support module
// Provides localized UI strings for English and Chinese; the highscore file itself is never localized

#[derive(Clone)]
pub struct Assets {
    // Start screen
    pub start_title: &'static str,
    pub start_header: &'static str,
    pub start_empty: &'static str,
    pub start_choose: &'static str,
    pub start_keys: &'static str,
    pub start_last_fmt: &'static str, // "Last played: {}"

    // Play screen
    pub status_fmt: &'static str, // " Mines: {}   Clicks: {} "
    pub hint_quit: &'static str,

    // End screen
    pub win_fmt: &'static str,  // "You won! - Your score: {}"
    pub loss_fmt: &'static str, // "You lost! - Score: {}"
    pub again: &'static str,

    // Terminal size messages
    pub tsmsg_line1: &'static str,
    pub tsmsg_line2_fmt: &'static str, // "Minimum required: {} x {}"
    pub tsmsg_title: &'static str,
}

/// Returns English language assets
pub fn english_assets() -> Assets {
    Assets {
        start_title: "MINESWEEPER PERSONAL HIGHSCORES:",
        start_header: "Date, W/L, Difficulty, Score",
        start_empty: "No games played yet",
        start_choose: "Choose difficulty:",
        start_keys: "Press 1 for easy, 2 for medium, 3 for hard",
        start_last_fmt: "Last played: {}",

        status_fmt: " Mines: {}   Clicks: {} ",
        hint_quit: "Esc/Q: Quit",

        win_fmt: "You won! - Your score: {}",
        loss_fmt: "You lost! - Score: {}",
        again: "Press space to play again",

        tsmsg_line1: "Terminal size too small.",
        tsmsg_line2_fmt: "Minimum required: {} x {}",
        tsmsg_title: "Resize Terminal",
    }
}

/// Returns Chinese language assets
pub fn chinese_assets() -> Assets {
    Assets {
        start_title: "扫雷 个人战绩:",
        start_header: "日期, 胜/负, 难度, 得分",
        start_empty: "暂无记录",
        start_choose: "选择难度:",
        start_keys: "按 1 简单, 2 中等, 3 困难",
        start_last_fmt: "上次难度: {}",

        status_fmt: " 地雷: {}   点击: {} ",
        hint_quit: "Esc/Q: 退出",

        win_fmt: "你赢了! - 得分: {}",
        loss_fmt: "你输了! - 得分: {}",
        again: "按空格键再来一局",

        tsmsg_line1: "终端窗口太小。",
        tsmsg_line2_fmt: "最小尺寸: {} x {}",
        tsmsg_title: "调整终端大小",
    }
}

/// Main language manager struct
/// Holds the current language code and active string assets
pub struct Lang {
    pub current_lang: String,
    pub assets: Assets,
}

impl Lang {
    /// Creates a new Lang instance from a language code
    /// Normalizes input (e.g., "zh-CN" → "zh") and defaults to English for unsupported languages
    pub fn new(lang_code: &str) -> Self {
        let code = if lang_code.to_lowercase().starts_with("zh") {
            "zh"
        } else {
            "en"
        };

        Lang {
            current_lang: code.to_string(),
            assets: if code == "zh" {
                chinese_assets()
            } else {
                english_assets()
            },
        }
    }
}

/// Fill `{}` placeholders in order
pub fn fill(fmt: &str, args: &[&dyn std::fmt::Display]) -> String {
    args.iter()
        .fold(fmt.to_string(), |s, a| s.replacen("{}", &a.to_string(), 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_normalize() {
        assert_eq!(Lang::new("zh-CN").current_lang, "zh");
        assert_eq!(Lang::new("en-US").current_lang, "en");
        assert_eq!(Lang::new("fr").current_lang, "en");
        assert_eq!(Lang::new("fr").assets.again, "Press space to play again");
    }

    #[test]
    fn fill_replaces_in_order() {
        assert_eq!(fill("Minimum required: {} x {}", &[&80, &24]), "Minimum required: 80 x 24");
        assert_eq!(fill("You lost! - Score: {}", &[&7]), "You lost! - Score: 7");
    }
}
