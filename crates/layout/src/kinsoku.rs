//! Line-break rules for East Asian text (kinsoku shori).

/// Language rule selecting the forbidden line-start / line-end tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineBreakRule {
    #[default]
    Japanese,
    SimplifiedChinese,
    TraditionalChinese,
    /// Hangul wraps at spaces only, like Latin words.
    Korean,
}

const JAPANESE_NOT_START: &str = "!%),.:;?]}¢°’”‰′″℃、。々〉》」』】〕〗〙〟ぁぃぅぇぉっゃゅょゎゕゖ\
ゝゞ゠・ァィゥェォッャュョヮヵヶーヽヾ！％），．：；？］｝｡｣､･ｧｨｩｪｫｬｭｮｯｰ…‥";
const JAPANESE_NOT_END: &str = "$([\\{£¥‘“〈《「『【〔〖〘〝＄（［｛｢￡￥";

const SIMPLIFIED_CHINESE_NOT_START: &str = "!%),.:;?]}¢°·’\"†‡›℃∶、。〃〆〕〗〞﹚﹜！＂％＇），．：；？］｝～";
const SIMPLIFIED_CHINESE_NOT_END: &str = "$(£¥·‘\"〈《「『【〔〖〝﹙﹛＄（．［｛￡￥";

const TRADITIONAL_CHINESE_NOT_START: &str = "!),.:;?]}¢·–—’\"•‥′╴、。〉》」』】〕〗〞﹐﹑﹒﹔﹕﹖﹗﹚﹜﹞！），．：；？｜｝";
const TRADITIONAL_CHINESE_NOT_END: &str = "([{£¥‘“‵〈《「『【〔〖﹙﹛﹝（｛";

const KOREAN_NOT_START: &str = "!%),.:;?]}¢°’”′″℃〉》」』】〕！％），．：；？］｝";
const KOREAN_NOT_END: &str = "$([\\{£¥‘“〈《「『【〔＄（［｛￦";

impl LineBreakRule {
    fn tables(self) -> (&'static str, &'static str) {
        match self {
            LineBreakRule::Japanese => (JAPANESE_NOT_START, JAPANESE_NOT_END),
            LineBreakRule::SimplifiedChinese => {
                (SIMPLIFIED_CHINESE_NOT_START, SIMPLIFIED_CHINESE_NOT_END)
            }
            LineBreakRule::TraditionalChinese => {
                (TRADITIONAL_CHINESE_NOT_START, TRADITIONAL_CHINESE_NOT_END)
            }
            LineBreakRule::Korean => (KOREAN_NOT_START, KOREAN_NOT_END),
        }
    }

    /// `ch` may not begin a line.
    pub fn is_forbidden_line_start(self, ch: char) -> bool {
        self.tables().0.contains(ch)
    }

    /// `ch` may not end a line.
    pub fn is_forbidden_line_end(self, ch: char) -> bool {
        self.tables().1.contains(ch)
    }

    /// Whether `ch` breaks like an ideograph (between any two such units).
    pub fn is_breakable_wide(self, ch: char) -> bool {
        if self == LineBreakRule::Korean && is_hangul(ch) {
            return false;
        }
        is_wide(ch)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "japanese" | "ja" => Some(LineBreakRule::Japanese),
            "simplified-chinese" | "simplifiedchinese" | "zh-hans" => {
                Some(LineBreakRule::SimplifiedChinese)
            }
            "traditional-chinese" | "traditionalchinese" | "zh-hant" => {
                Some(LineBreakRule::TraditionalChinese)
            }
            "korean" | "ko" => Some(LineBreakRule::Korean),
            _ => None,
        }
    }
}

/// East Asian wide or fullwidth character.
pub fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x2FFFD
        | 0x30000..=0x3FFFD
    )
}

pub fn is_hangul(ch: char) -> bool {
    matches!(ch as u32, 0x1100..=0x11FF | 0x3130..=0x318F | 0xAC00..=0xD7A3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn japanese_tables_cover_common_punctuation() {
        let rule = LineBreakRule::Japanese;
        assert!(rule.is_forbidden_line_start('。'));
        assert!(rule.is_forbidden_line_start('っ'));
        assert!(rule.is_forbidden_line_start('ー'));
        assert!(rule.is_forbidden_line_end('「'));
        assert!(!rule.is_forbidden_line_start('あ'));
        assert!(!rule.is_forbidden_line_end('」'));
    }

    #[test]
    fn hangul_is_only_wide_outside_korean_rule() {
        assert!(is_wide('한'));
        assert!(LineBreakRule::Japanese.is_breakable_wide('한'));
        assert!(!LineBreakRule::Korean.is_breakable_wide('한'));
        assert!(LineBreakRule::Korean.is_breakable_wide('漢'));
    }

    #[test]
    fn latin_is_narrow() {
        assert!(!is_wide('a'));
        assert!(!is_wide(' '));
        assert!(is_wide('Ａ'));
    }
}
