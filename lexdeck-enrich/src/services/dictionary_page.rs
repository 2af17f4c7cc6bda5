//! Dictionary entry page parsing
//!
//! Pulls the few fields the pipeline needs out of a Cambridge Dictionary
//! entry page: the first IPA transcription, the first part-of-speech label,
//! and every audio reference the page exposes. Parsing is tag-level (regex
//! over opening/closing tags with nesting depth tracking), not a full DOM.

use crate::types::AudioReferences;
use once_cell::sync::Lazy;
use regex::Regex;

static OPEN_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([A-Za-z][A-Za-z0-9]*)\b([^>]*)>").expect("static regex"));

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("static regex")
});

static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("static regex"));

static NUMERIC_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#([xX][0-9A-Fa-f]+|[0-9]+);").expect("static regex"));

/// Fields extracted from one dictionary entry page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryEntry {
    /// Transcription rendered as `/…/`
    pub transcription: Option<String>,
    /// Lower-cased part-of-speech label (e.g. "adjective")
    pub part_of_speech: Option<String>,
    pub audio: AudioReferences,
}

/// One opening tag located in the page
#[derive(Debug)]
struct OpenTag<'a> {
    name: String,
    attrs: Vec<(String, String)>,
    /// Byte offset just past the closing `>`
    end: usize,
    raw: &'a str,
}

impl<'a> OpenTag<'a> {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|token| token == class))
            .unwrap_or(false)
    }

    fn class_is(&self, classes: &str) -> bool {
        self.attr("class").map(|c| c.trim() == classes).unwrap_or(false)
    }

    fn is_self_closing(&self) -> bool {
        self.raw.trim_end_matches('>').trim_end().ends_with('/')
    }
}

fn open_tags(html: &str) -> impl Iterator<Item = OpenTag<'_>> {
    OPEN_TAG.captures_iter(html).filter_map(|caps| {
        let whole = caps.get(0)?;
        let attrs = ATTRIBUTE
            .captures_iter(&caps[2])
            .map(|a| {
                let value = a.get(2).or_else(|| a.get(3)).map(|m| m.as_str()).unwrap_or("");
                (a[1].to_string(), decode_entities(value))
            })
            .collect();
        Some(OpenTag {
            name: caps[1].to_ascii_lowercase(),
            attrs,
            end: whole.end(),
            raw: whole.as_str(),
        })
    })
}

/// Text content of the element whose opening tag ends at `content_start`
///
/// Tracks nesting of same-named tags so inner elements (IPA pages wrap
/// stress marks in nested spans) do not end the element early.
fn element_text(html: &str, tag_name: &str, content_start: usize) -> String {
    let pattern = format!(r"(?i)<(/?){}\b[^>]*?(/?)>", regex::escape(tag_name));
    let content_end = match Regex::new(&pattern) {
        Ok(boundary) => {
            let mut depth = 1usize;
            let mut end = html.len();
            for caps in boundary.captures_iter(&html[content_start..]) {
                let closing = !caps[1].is_empty();
                let self_closing = !caps[2].is_empty();
                if closing {
                    depth -= 1;
                    if depth == 0 {
                        end = content_start + caps.get(0).map(|m| m.start()).unwrap_or(0);
                        break;
                    }
                } else if !self_closing {
                    depth += 1;
                }
            }
            end
        }
        Err(_) => html.len(),
    };

    let inner = &html[content_start..content_end];
    decode_entities(&ANY_TAG.replace_all(inner, ""))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode the handful of HTML entities that appear in entry pages
fn decode_entities(text: &str) -> String {
    let named = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'");

    let numeric = NUMERIC_ENTITY.replace_all(&named, |caps: &regex::Captures| {
        let body = &caps[1];
        let code = if let Some(hex) = body.strip_prefix(|c: char| c == 'x' || c == 'X') {
            u32::from_str_radix(hex, 16).ok()
        } else {
            body.parse::<u32>().ok()
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    numeric.replace("&amp;", "&")
}

/// Parse an entry page into a [`DictionaryEntry`]
pub fn parse_entry_page(html: &str) -> DictionaryEntry {
    let mut entry = DictionaryEntry::default();
    let tags: Vec<OpenTag<'_>> = open_tags(html).collect();

    if let Some(tag) = tags.iter().find(|t| t.name == "span" && t.has_class("ipa")) {
        let text = element_text(html, "span", tag.end);
        if !text.is_empty() {
            entry.transcription = Some(format!("/{}/", text));
        }
    }

    if let Some(tag) = tags.iter().find(|t| t.name == "span" && t.class_is("pos dpos")) {
        let text = element_text(html, "span", tag.end).to_lowercase();
        if !text.is_empty() {
            entry.part_of_speech = Some(text);
        }
    }

    entry.audio.sources = tags
        .iter()
        .filter(|t| t.name == "source" && t.attr("type") == Some("audio/mpeg"))
        .filter_map(|t| t.attr("src"))
        .filter(|src| !src.is_empty())
        .map(str::to_string)
        .collect();

    entry.audio.hidden_audio = hidden_audio_source(html, &tags);

    entry.audio.play_button = tags
        .iter()
        .find(|t| t.name == "span" && t.has_class("audio_play_button"))
        .and_then(|t| t.attr("data-src-mp3"))
        .filter(|src| !src.is_empty())
        .map(str::to_string);

    entry
}

/// `audio/mpeg` source inside the first hidden `<audio class="hdn">` element
fn hidden_audio_source(html: &str, tags: &[OpenTag<'_>]) -> Option<String> {
    let audio = tags
        .iter()
        .find(|t| t.name == "audio" && t.has_class("hdn") && !t.is_self_closing())?;

    let rest = &html[audio.end..];
    let close = rest.to_ascii_lowercase().find("</audio").unwrap_or(rest.len());
    let body = &rest[..close];

    open_tags(body)
        .find(|t| t.name == "source" && t.attr("type") == Some("audio/mpeg") && t.attr("src").is_some())
        .and_then(|t| t.attr("src").map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUICK_PAGE: &str = r#"
        <div class="pos-header dpos-h">
          <span class="hw dhw">quick</span>
          <div class="posgram dpos-g"><span class="pos dpos" title="A word that describes">Adjective</span></div>
          <span class="us dpron-i">
            <span class="daud">
              <audio class="hdn" id="audio2">
                <source type="audio/mpeg" src="/us/media/english/us_pron/q/qui/quick/quick.mp3"/>
                <source type="audio/ogg" src="/us/media/english/us_pron_ogg/q/qui/quick/quick.ogg"/>
              </audio>
            </span>
            <span class="pron dpron">/<span class="ipa dipa lpr-2 lpl-1">kw<span class="sp dsp">ɪ</span>k</span>/</span>
          </span>
        </div>
    "#;

    #[test]
    fn test_parse_transcription_with_nested_spans() {
        let entry = parse_entry_page(QUICK_PAGE);
        assert_eq!(entry.transcription.as_deref(), Some("/kwɪk/"));
    }

    #[test]
    fn test_parse_part_of_speech_lowercased() {
        let entry = parse_entry_page(QUICK_PAGE);
        assert_eq!(entry.part_of_speech.as_deref(), Some("adjective"));
    }

    #[test]
    fn test_parse_audio_sources_in_order() {
        let entry = parse_entry_page(QUICK_PAGE);
        assert_eq!(
            entry.audio.sources,
            vec!["/us/media/english/us_pron/q/qui/quick/quick.mp3".to_string()]
        );
        assert_eq!(
            entry.audio.hidden_audio.as_deref(),
            Some("/us/media/english/us_pron/q/qui/quick/quick.mp3")
        );
        assert!(entry.audio.play_button.is_none());
    }

    #[test]
    fn test_parse_play_button() {
        let html = r#"<span class="audio_play_button pron-us" data-src-mp3="/media/quick.mp3" title="Listen"></span>"#;
        let entry = parse_entry_page(html);
        assert_eq!(entry.audio.play_button.as_deref(), Some("/media/quick.mp3"));
        assert!(entry.audio.sources.is_empty());
    }

    #[test]
    fn test_pos_class_must_match_exactly() {
        let html = r#"<span class="pos dpos extra">noun</span>"#;
        let entry = parse_entry_page(html);
        assert!(entry.part_of_speech.is_none());
    }

    #[test]
    fn test_search_page_yields_empty_entry() {
        let entry = parse_entry_page("<html><body><h1>Search results</h1></body></html>");
        assert_eq!(entry, DictionaryEntry::default());
    }

    #[test]
    fn test_entities_decoded() {
        let html = r#"<span class="ipa">&#712;kw&#618;k &amp;</span>"#;
        let entry = parse_entry_page(html);
        assert_eq!(entry.transcription.as_deref(), Some("/ˈkwɪk &/"));
    }
}
