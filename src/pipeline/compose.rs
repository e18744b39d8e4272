//! Composing stage: author the output PDF containing the translated text.
//!
//! The document is built from scratch with lopdf: an A4 page tree, a
//! standard Helvetica Type1 font, and one content stream per page drawing
//! black text from a fixed offset below the top-left margin.
//!
//! Layout is deliberately primitive. The default [`WrapPolicy::None`]
//! draws one output line per input line and lets long text run off the
//! page; `Wrap` and `Paginate` make the overflow handling an explicit
//! choice. Line metrics use the Helvetica
//! average advance of ~0.5 em, which is plenty for a best-effort text dump.

use crate::config::{LayoutConfig, WrapPolicy};
use crate::error::PipelineError;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

// A4 in points.
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;

/// Line height as a multiple of font size.
const LINE_HEIGHT_FACTOR: f32 = 1.25;

/// Approximate Helvetica advance per character, in em.
const AVG_CHAR_WIDTH_EM: f32 = 0.5;

/// Authors the output document for one translated text block.
pub trait Composer: Send + Sync {
    /// Build and serialize a PDF containing `text`. Always emits at least
    /// one page, even for empty input.
    fn compose(&self, text: &str) -> Result<Vec<u8>, PipelineError>;
}

/// The production composer, backed by lopdf.
pub struct LopdfComposer {
    layout: LayoutConfig,
}

impl LopdfComposer {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Split `text` into pages of lines according to the wrap policy.
    fn layout_pages(&self, text: &str) -> Vec<Vec<String>> {
        let raw: Vec<&str> = text.split('\n').collect();

        let lines: Vec<String> = match self.layout.wrap {
            WrapPolicy::None => raw.iter().map(|l| l.to_string()).collect(),
            WrapPolicy::Wrap | WrapPolicy::Paginate => {
                let max_chars = self.max_chars_per_line();
                raw.iter().flat_map(|l| wrap_line(l, max_chars)).collect()
            }
        };

        match self.layout.wrap {
            WrapPolicy::Paginate => {
                let per_page = self.lines_per_page();
                let mut pages: Vec<Vec<String>> =
                    lines.chunks(per_page).map(|c| c.to_vec()).collect();
                if pages.is_empty() {
                    pages.push(Vec::new());
                }
                pages
            }
            _ => vec![lines],
        }
    }

    fn max_chars_per_line(&self) -> usize {
        let usable = PAGE_WIDTH - 2.0 * self.layout.margin;
        ((usable / (AVG_CHAR_WIDTH_EM * self.layout.font_size)) as usize).max(1)
    }

    fn lines_per_page(&self) -> usize {
        let usable = PAGE_HEIGHT - 2.0 * self.layout.margin;
        ((usable / (LINE_HEIGHT_FACTOR * self.layout.font_size)) as usize).max(1)
    }
}

impl Composer for LopdfComposer {
    fn compose(&self, text: &str) -> Result<Vec<u8>, PipelineError> {
        let pages = self.layout_pages(text);

        let mut doc = Document::with_version("1.5");
        let page_tree_id = doc.new_object_id();

        let font_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ]));

        let resources_id = doc.add_object(Dictionary::from_iter([(
            "Font",
            Object::Dictionary(Dictionary::from_iter([(
                "F1",
                Object::Reference(font_id),
            )])),
        )]));

        let line_height = LINE_HEIGHT_FACTOR * self.layout.font_size;
        let origin_x = self.layout.margin;
        let origin_y = PAGE_HEIGHT - self.layout.margin;

        let mut kids = Vec::with_capacity(pages.len());
        for lines in &pages {
            let mut operations = vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), self.layout.font_size.into()]),
                Operation::new("TL", vec![line_height.into()]),
                Operation::new("rg", vec![0.into(), 0.into(), 0.into()]),
                Operation::new("Td", vec![origin_x.into(), origin_y.into()]),
            ];
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    operations.push(Operation::new("T*", vec![]));
                }
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(
                        encode_winansi(line),
                        StringFormat::Literal,
                    )],
                ));
            }
            operations.push(Operation::new("ET", vec![]));

            let content_bytes = Content { operations }.encode().map_err(|e| {
                PipelineError::CompositionFailed {
                    detail: format!("content encoding: {e}"),
                }
            })?;
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content_bytes));

            let page_id = doc.add_object(Dictionary::from_iter([
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(page_tree_id)),
                ("Contents", Object::Reference(content_id)),
                ("Resources", Object::Reference(resources_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        0.into(),
                        0.into(),
                        PAGE_WIDTH.into(),
                        PAGE_HEIGHT.into(),
                    ]),
                ),
            ]));
            kids.push(Object::Reference(page_id));
        }

        let page_tree = Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(kids.len() as i64)),
            ("Kids", Object::Array(kids)),
        ]);
        doc.objects.insert(page_tree_id, Object::Dictionary(page_tree));

        let catalog_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(page_tree_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| PipelineError::CompositionFailed {
                detail: format!("serialization: {e}"),
            })?;
        Ok(bytes)
    }
}

/// Greedy word-wrap of a single line to at most `max_chars` characters.
///
/// Words longer than `max_chars` are broken at the limit so no line ever
/// exceeds it.
fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    if line.chars().count() <= max_chars {
        return vec![line.to_string()];
    }

    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if current_len > 0 && current_len + 1 + word_len > max_chars {
            out.push(std::mem::take(&mut current));
        }
        if word_len > max_chars {
            // Break the oversized word across lines.
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_chars) {
                out.push(chunk.iter().collect());
            }
            // Last chunk may still take more words if short; keep it simple
            // and start fresh instead.
            if let Some(last) = out.pop() {
                current = last;
            }
            continue;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

/// Encode text for a Type1 Helvetica literal string.
///
/// Characters outside Latin-1 cannot be represented without font embedding
/// and are replaced with '?'.
fn encode_winansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| {
            let cp = c as u32;
            if cp <= 0xFF {
                cp as u8
            } else {
                b'?'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer(wrap: WrapPolicy) -> LopdfComposer {
        LopdfComposer::new(LayoutConfig {
            wrap,
            ..LayoutConfig::default()
        })
    }

    #[test]
    fn compose_emits_valid_single_page_pdf() {
        let bytes = composer(WrapPolicy::None)
            .compose("Hello world\nsecond line")
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn compose_empty_text_still_emits_one_page() {
        let bytes = composer(WrapPolicy::None).compose("").unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn no_wrap_keeps_input_lines_verbatim() {
        let c = composer(WrapPolicy::None);
        let very_long = "x".repeat(500);
        let pages = c.layout_pages(&very_long);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].len(), 1, "WrapPolicy::None must not wrap");
    }

    #[test]
    fn wrap_policy_bounds_line_length() {
        let c = composer(WrapPolicy::Wrap);
        let max = c.max_chars_per_line();
        let pages = c.layout_pages(&"word ".repeat(200));
        assert_eq!(pages.len(), 1);
        assert!(pages[0].len() > 1);
        assert!(pages[0].iter().all(|l| l.chars().count() <= max));
    }

    #[test]
    fn paginate_spills_onto_additional_pages() {
        let c = composer(WrapPolicy::Paginate);
        let text = "line\n".repeat(3 * c.lines_per_page());
        let bytes = c.compose(&text).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() >= 3, "got {}", doc.get_pages().len());
    }

    #[test]
    fn wrap_line_preserves_all_words() {
        let lines = wrap_line("the quick brown fox jumps over the lazy dog", 10);
        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn wrap_line_breaks_oversized_words() {
        let lines = wrap_line("abcdefghijklmnop", 5);
        assert!(lines.iter().all(|l| l.chars().count() <= 5));
        assert_eq!(lines.concat(), "abcdefghijklmnop");
    }

    #[test]
    fn winansi_replaces_unrepresentable_chars() {
        assert_eq!(encode_winansi("abc"), b"abc");
        assert_eq!(encode_winansi("café")[3], 0xE9);
        assert_eq!(encode_winansi("ع"), b"?");
    }
}
