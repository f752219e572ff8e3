//! 说话人识别
//!
//! 逐行扫描，再在行内按子句切分。行首按优先级依次尝试:
//! 1. `Name: ...`（行首标签）
//! 2. `Name said: ...`（说话动词，大小写不敏感）
//! 3. `"...", - Name`（行尾破折号署名）
//!
//! 没有匹配任何规则的行作为上一条说话的续行；在第一条说话之前出现则丢弃

use once_cell::sync::Lazy;
use regex::Regex;

use super::{DialogueOccurrence, SpeakerLabel};

/// 名字：大写开头的词，后面最多再跟两个大写词或数字（`Mary Jane`、`Speaker 1`）
const NAME: &str =
    r"\p{Lu}[\p{L}\p{M}\p{N}'’\-]*(?:[ \t]+(?:\p{Lu}[\p{L}\p{M}\p{N}'’\-]*|\p{N}+)){0,2}";

const SPEECH_VERBS: &str = "said|says|replied|replies|asked|asks|answered|answers|responded|responds|\
shouted|shouts|whispered|whispers|exclaimed|exclaims|added|adds|continued|continues|yelled|yells|\
murmured|murmurs|muttered|mutters|cried|cries|called|declared|stated";

/// 名字最大字符数
const MAX_NAME_CHARS: usize = 40;

/// 句首的连词与副词，出现在名字前面时不算名字的一部分（`Then Bob said:` 的说话人是 Bob）
const LEADING_STOP_WORDS: &[&str] = &[
    "and", "but", "or", "so", "then", "now", "well", "oh", "also", "yet", "still", "soon",
    "later", "finally", "suddenly", "meanwhile", "afterwards", "again", "instead", "next",
];

static LINE_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r#"^(?P<open>["“'‘])?\s*(?P<name>{NAME})\s*:(?P<rest>.*)$"#)).expect("valid regex")
});

static SPEECH_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"^(?P<open>["“'‘])?\s*(?P<name>{NAME})\s+(?i:{SPEECH_VERBS})\s*:(?P<rest>.*)$"#
    ))
    .expect("valid regex")
});

/// 行内说话标记，必须紧跟在句末标点之后
static INLINE_SPEECH_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"[.!?…]["”’']?\s+(?P<name>{NAME})\s+(?i:{SPEECH_VERBS})\s*:"#
    ))
    .expect("valid regex")
});

static TRAILING_DASH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"^(?P<rest>.*?)(?:\s+[-–—]{{1,2}}\s*|\s*[-–—]{{1,2}}\s+)(?P<name>{NAME})\s*[.!]?$"#
    ))
    .expect("valid regex")
});

static SPEECH_VERB_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^(?i:{SPEECH_VERBS})$")).expect("valid regex"));

/// 说话署名规则，`PRIORITY` 即匹配顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributionRule {
    LineLabel,
    SpeechVerb,
    TrailingDash,
}

/// 单条规则对一行的匹配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub rule: AttributionRule,
    pub speaker: SpeakerLabel,
    /// 行首规则为标记之后的剩余文本；破折号规则为署名之前的子句
    pub utterance: &'a str,
}

impl AttributionRule {
    pub const PRIORITY: [AttributionRule; 3] = [
        AttributionRule::LineLabel,
        AttributionRule::SpeechVerb,
        AttributionRule::TrailingDash,
    ];

    fn regex(&self) -> &'static Regex {
        match self {
            Self::LineLabel => &*LINE_LABEL_RE,
            Self::SpeechVerb => &*SPEECH_VERB_RE,
            Self::TrailingDash => &*TRAILING_DASH_RE,
        }
    }

    /// 对一整行（已去除首尾空白）尝试本规则
    pub fn match_line<'a>(&self, line: &'a str) -> Option<RuleMatch<'a>> {
        let caps = self.regex().captures(line)?;
        let name = caps.name("name")?.as_str();
        let mut rest = caps.name("rest")?.as_str();

        // `ALICE SAID:` 会被当作名字 "ALICE SAID"，交给说话动词规则
        if *self == Self::LineLabel && ends_with_speech_verb(name) {
            return None;
        }
        let name = speaker_name(name)?;

        // 标记前的开引号由行尾的闭引号配对
        if let Some(open) = caps.name("open") {
            rest = strip_closing_quote(rest, open.as_str());
        }

        if *self == Self::TrailingDash && clean_utterance(rest).is_empty() {
            return None;
        }

        Some(RuleMatch {
            rule: *self,
            speaker: SpeakerLabel::new(name),
            utterance: rest,
        })
    }
}

/// 一行的扫描结果
#[derive(Debug, PartialEq, Eq)]
enum LineScan<'a> {
    /// 无署名，整行为续行
    Continuation(&'a str),
    /// `leading` 为第一个标记之前的文本（续行），`clauses` 为按顺序的说话
    Attributed {
        leading: &'a str,
        clauses: Vec<(SpeakerLabel, &'a str)>,
    },
}

/// 识别文本中的说话人
///
/// 纯函数：相同输入总是得到相同输出
pub fn detect_speakers(text: &str) -> Vec<DialogueOccurrence> {
    let mut occurrences: Vec<DialogueOccurrence> = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = index + 1;

        match scan_line(line) {
            LineScan::Continuation(rest) => append_continuation(&mut occurrences, rest, line_no),
            LineScan::Attributed { leading, clauses } => {
                append_continuation(&mut occurrences, leading, line_no);
                for (speaker, utterance) in clauses {
                    let position = occurrences.len();
                    occurrences.push(DialogueOccurrence {
                        speaker,
                        utterance: clean_utterance(utterance),
                        position,
                        line: line_no,
                    });
                }
            }
        }
    }

    tracing::debug!(
        occurrences = occurrences.len(),
        "Speaker detection finished"
    );

    occurrences
}

/// 行内状态机：行首规则 -> 行内说话标记 -> 行尾破折号 -> 续行
fn scan_line(line: &str) -> LineScan<'_> {
    for rule in AttributionRule::PRIORITY {
        if rule == AttributionRule::TrailingDash {
            let (leading, clauses) = split_clauses(None, line);
            if !clauses.is_empty() {
                return LineScan::Attributed { leading, clauses };
            }
        }

        if let Some(m) = rule.match_line(line) {
            if rule == AttributionRule::TrailingDash {
                return LineScan::Attributed {
                    leading: "",
                    clauses: vec![(m.speaker, m.utterance)],
                };
            }
            let (leading, clauses) = split_clauses(Some(m.speaker), m.utterance);
            return LineScan::Attributed { leading, clauses };
        }
    }

    LineScan::Continuation(line)
}

/// 在行内说话标记处切分子句
///
/// `current` 为已确定的当前说话人；为 None 时第一个标记之前的文本作为 leading 返回
fn split_clauses(
    mut current: Option<SpeakerLabel>,
    text: &str,
) -> (&str, Vec<(SpeakerLabel, &str)>) {
    let mut leading = "";
    let mut clauses = Vec::new();
    let mut cursor = 0;

    for caps in INLINE_SPEECH_VERB_RE.captures_iter(text) {
        let (Some(name), Some(whole)) = (caps.name("name"), caps.get(0)) else {
            continue;
        };
        let Some(label) = speaker_name(name.as_str()) else {
            continue;
        };

        let chunk = &text[cursor..name.start()];
        match current.take() {
            Some(speaker) => clauses.push((speaker, chunk)),
            None => leading = chunk,
        }
        current = Some(SpeakerLabel::new(label));
        cursor = whole.end();
    }

    match current {
        Some(speaker) => clauses.push((speaker, &text[cursor..])),
        None => leading = text,
    }

    (leading, clauses)
}

fn append_continuation(occurrences: &mut [DialogueOccurrence], text: &str, line_no: usize) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }

    match occurrences.last_mut() {
        Some(last) => {
            if !last.utterance.is_empty() {
                last.utterance.push(' ');
            }
            last.utterance.push_str(text);
        }
        None => {
            tracing::trace!(line = line_no, "Dropping text before the first speaker");
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name.chars().count() <= MAX_NAME_CHARS
}

fn is_stop_word(word: &str) -> bool {
    LEADING_STOP_WORDS
        .iter()
        .any(|stop| stop.eq_ignore_ascii_case(word))
}

/// 去掉句首连词/副词后的名字；只剩这些词或名字无效时返回 None
fn speaker_name(name: &str) -> Option<&str> {
    let mut name = name.trim();
    while let Some((word, tail)) = name.split_once(char::is_whitespace) {
        if !is_stop_word(word) {
            break;
        }
        name = tail.trim_start();
    }

    if is_stop_word(name) || !is_valid_name(name) {
        return None;
    }
    Some(name)
}

/// 去掉与开引号配对的行尾闭引号；剩余文本自身是完整引语时保留给 `clean_utterance`
fn strip_closing_quote<'a>(rest: &'a str, open: &str) -> &'a str {
    let Some(close) = QUOTE_PAIRS
        .iter()
        .find(|(o, _)| open.starts_with(*o))
        .map(|(_, c)| *c)
    else {
        return rest;
    };

    let trimmed = rest.trim_end();
    match trimmed.strip_suffix(close) {
        Some(inner) if !inner.trim_start().starts_with(open) => inner,
        _ => rest,
    }
}

fn ends_with_speech_verb(name: &str) -> bool {
    name.split_whitespace()
        .last()
        .map(|word| SPEECH_VERB_WORD_RE.is_match(word))
        .unwrap_or(false)
}

const QUOTE_PAIRS: [(char, char); 4] = [('"', '"'), ('“', '”'), ('\'', '\''), ('‘', '’')];

const TRAILING_PUNCT: &[char] = &[',', ';'];

/// 清理说话文本：去空白、去尾部逗号分号、去掉一对包裹引号
fn clean_utterance(text: &str) -> String {
    let text = text.trim().trim_end_matches(TRAILING_PUNCT).trim_end();

    for (open, close) in QUOTE_PAIRS {
        if let Some(inner) = text.strip_prefix(open).and_then(|t| t.strip_suffix(close)) {
            if !inner.contains(open) && !inner.contains(close) {
                return inner.trim().trim_end_matches(TRAILING_PUNCT).trim_end().to_string();
            }
        }
    }

    text.to_string()
}
