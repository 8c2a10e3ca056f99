//! Paginated layout of a script document.
//!
//! Coordinates are millimetres on an A4 portrait page, measured from the
//! top-left corner; `y` is the text baseline. Every block is measured
//! before it is placed and moved to a fresh page when it would end below
//! [`BOTTOM_LIMIT`]. A block taller than a page is split across pages.

use crate::domain::{ScriptArtifact, Segment};

use super::metrics::wrap;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 20.0;
pub const TOP_MARGIN: f32 = 20.0;
pub const TEXT_WIDTH: f32 = 170.0;
pub const BOTTOM_LIMIT: f32 = 250.0;
pub const LINE_ADVANCE: f32 = 6.0;

/// Right end of the divider under the header
const RULE_END: f32 = 190.0;

/// Tag printed at the top of the first page
pub const PRODUCT_TAG: &str = "alurio";

const HEADER_TEXT: &str = "alurio.io";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

const BRAND: Rgb = Rgb(139, 92, 246);
const INK: Rgb = Rgb(17, 24, 39);
const BODY: Rgb = Rgb(31, 41, 55);
const LABEL: Rgb = Rgb(75, 85, 99);
const MUTED: Rgb = Rgb(107, 114, 128);
const DIVIDER: Rgb = Rgb(229, 231, 235);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

/// A single drawing instruction
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        style: FontStyle,
        color: Rgb,
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text content of the page, one entry per line
    pub fn lines(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                DrawOp::Rule { .. } => None,
            })
            .collect()
    }
}

/// A laid-out script, ready for serialization
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptDocument {
    pub title: String,
    pub pages: Vec<Page>,
}

impl ScriptDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Suggested file name for the rendered document
    pub fn file_name(&self) -> String {
        file_name(&self.title)
    }
}

/// `alurio-roteiro-<slug>.pdf`, slug = lowercase title with whitespace runs
/// replaced by a single hyphen
pub fn file_name(title: &str) -> String {
    let slug = title
        .to_lowercase()
        .split(char::is_whitespace)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let slug = slug.replace(['/', '\\'], "-");
    format!("{}-roteiro-{}.pdf", PRODUCT_TAG, slug)
}

/// A text run relative to the top of its block
struct Line {
    dy: f32,
    size: f32,
    style: FontStyle,
    color: Rgb,
    text: String,
}

/// A group of lines kept on one page whenever it fits on one
struct Block {
    /// Space above the first baseline
    lead: f32,
    lines: Vec<Line>,
    /// Cursor advance after the block, measured from the block start
    advance: f32,
}

impl Block {
    fn new(lead: f32) -> Self {
        Self {
            lead,
            lines: Vec::new(),
            advance: lead,
        }
    }

    /// Add one line at the current advance, moving the advance by `step`
    fn line(&mut self, text: impl Into<String>, size: f32, style: FontStyle, color: Rgb, step: f32) {
        self.lines.push(Line {
            dy: self.advance,
            size,
            style,
            color,
            text: text.into(),
        });
        self.advance += step;
    }

    /// Add wrapped text; each line advances by [`LINE_ADVANCE`]
    fn paragraph(&mut self, text: &str, size: f32, style: FontStyle, color: Rgb) {
        for line in wrap(text, size, TEXT_WIDTH) {
            self.line(line, size, style, color, LINE_ADVANCE);
        }
    }

    fn skip(&mut self, amount: f32) {
        self.advance += amount;
    }

    /// Baseline of the last line, relative to the block start
    fn extent(&self) -> f32 {
        self.lines.last().map_or(self.lead, |l| l.dy)
    }
}

/// Running cursor over the page sequence
struct Layout {
    pages: Vec<Page>,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: TOP_MARGIN,
        }
    }

    fn current(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn break_page(&mut self) {
        self.pages.push(Page::default());
        self.y = TOP_MARGIN;
    }

    /// Place a block, breaking first if it would cross the bottom limit.
    ///
    /// A block taller than a whole page still starts on the current page once
    /// that page is fresh; lines past the bottom limit continue at the top of
    /// the next page, keeping their spacing.
    fn place(&mut self, block: Block) {
        let at_top = self.y <= TOP_MARGIN && self.current().ops.is_empty();
        if !at_top && self.y + block.extent() > BOTTOM_LIMIT {
            self.break_page();
        }

        let mut top = self.y;
        for line in block.lines {
            if top + line.dy > BOTTOM_LIMIT {
                self.break_page();
                top = TOP_MARGIN - line.dy;
            }
            let op = DrawOp::Text {
                x: MARGIN,
                y: top + line.dy,
                size: line.size,
                style: line.style,
                color: line.color,
                text: line.text,
            };
            self.current().ops.push(op);
        }
        self.y = top + block.advance;
    }

    fn rule(&mut self, advance_after: f32) {
        let y = self.y;
        self.current().ops.push(DrawOp::Rule {
            x1: MARGIN,
            x2: RULE_END,
            y,
            color: DIVIDER,
        });
        self.y += advance_after;
    }
}

/// Speech line followed by the visual action
fn push_segment(block: &mut Block, segment: &Segment) {
    block.paragraph(&format!("Fala: {}", segment.spoken_line), 12.0, FontStyle::Regular, BODY);
    block.skip(2.0);
    block.paragraph(&format!("Ação: {}", segment.visual_action), 10.0, FontStyle::Italic, BODY);
    // The next block measures from the action baseline
    block.advance -= LINE_ADVANCE;
}

/// Lay out a script for print.
///
/// Pure function of the artifact: rendering the same script twice yields
/// identical documents.
pub fn render_script_document(script: &ScriptArtifact) -> ScriptDocument {
    let mut layout = Layout::new();

    // Header
    let mut header = Block::new(0.0);
    header.line(HEADER_TEXT, 22.0, FontStyle::Bold, BRAND, 15.0);
    let title_lines = wrap(&script.title, 18.0, TEXT_WIDTH);
    let title_count = title_lines.len();
    for (i, line) in title_lines.into_iter().enumerate() {
        let step = if i + 1 == title_count { 10.0 } else { 8.0 };
        header.line(line, 18.0, FontStyle::Regular, INK, step);
    }
    header.line(
        format!(
            "Duração: {}s | Formato: {}",
            script.duration_seconds, script.requested_length
        ),
        10.0,
        FontStyle::Regular,
        MUTED,
        15.0,
    );
    layout.place(header);
    layout.rule(15.0);

    let mut hook = Block::new(0.0);
    hook.line("GANCHO (HOOK):", 12.0, FontStyle::Bold, BRAND, 7.0);
    push_segment(&mut hook, &script.hook);
    layout.place(hook);

    // The section heading travels with the first block
    for (index, segment) in script.development_blocks.iter().enumerate() {
        let mut block = if index == 0 {
            let mut block = Block::new(15.0);
            block.line("DESENVOLVIMENTO:", 12.0, FontStyle::Bold, BRAND, 10.0);
            block
        } else {
            Block::new(10.0)
        };
        block.line(format!("Bloco #{}", index + 1), 10.0, FontStyle::Bold, LABEL, 6.0);
        push_segment(&mut block, segment);
        layout.place(block);
    }

    // Closing
    let mut cta = Block::new(15.0);
    cta.line("FECHAMENTO (CTA):", 12.0, FontStyle::Bold, BRAND, 7.0);
    push_segment(&mut cta, &script.closing_cta);
    layout.place(cta);

    // Recording tips: heading stays with the first tip
    let mut tips = script.recording_tips.iter();
    let mut heading = Block::new(20.0);
    heading.line("DICAS DE GRAVAÇÃO:", 10.0, FontStyle::Bold, MUTED, 7.0);
    if let Some(first) = tips.next() {
        heading.paragraph(&format!("• {}", first), 10.0, FontStyle::Regular, BODY);
    }
    layout.place(heading);
    for tip in tips {
        let mut block = Block::new(0.0);
        block.paragraph(&format!("• {}", tip), 10.0, FontStyle::Regular, BODY);
        layout.place(block);
    }

    ScriptDocument {
        title: script.title.clone(),
        pages: layout.pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArtifactId, ContentStatus, ScriptLength};
    use chrono::{TimeZone, Utc};

    fn script(blocks: usize) -> ScriptArtifact {
        ScriptArtifact {
            id: ArtifactId::from("doc"),
            title: "5 erros de produtividade".to_string(),
            hook: Segment::new("Você está perdendo tempo", "Close no relógio"),
            development_blocks: (0..blocks)
                .map(|i| Segment::new(format!("Erro número {}", i + 1), "Corte seco"))
                .collect(),
            closing_cta: Segment::new("Salve este vídeo", "Apontar para a tela"),
            recording_tips: vec!["Luz natural".to_string(), "Fale devagar".to_string()],
            reach_tips: vec![],
            next_themes: vec![],
            duration_seconds: 50,
            requested_length: ScriptLength::Medium,
            status: ContentStatus::Ready,
            is_used: false,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn text_y(page: &Page, needle: &str) -> Option<f32> {
        page.ops.iter().find_map(|op| match op {
            DrawOp::Text { text, y, .. } if text == needle => Some(*y),
            _ => None,
        })
    }

    #[test]
    fn test_header_positions() {
        let doc = render_script_document(&script(1));
        let page = &doc.pages[0];

        assert_eq!(text_y(page, "alurio.io"), Some(20.0));
        assert_eq!(text_y(page, "5 erros de produtividade"), Some(35.0));
        assert_eq!(text_y(page, "Duração: 50s | Formato: Médio"), Some(45.0));
        assert!(page
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::Rule { y, .. } if *y == 60.0)));
        assert_eq!(text_y(page, "GANCHO (HOOK):"), Some(75.0));
        assert_eq!(text_y(page, "Fala: Você está perdendo tempo"), Some(82.0));
        assert_eq!(text_y(page, "Ação: Close no relógio"), Some(90.0));
    }

    #[test]
    fn test_short_script_fits_one_page() {
        let doc = render_script_document(&script(3));
        assert_eq!(doc.page_count(), 1);

        let lines = doc.pages[0].lines();
        assert!(lines.contains(&"Bloco #1"));
        assert!(lines.contains(&"Bloco #3"));
        assert!(lines.contains(&"FECHAMENTO (CTA):"));
        assert!(lines.contains(&"• Fale devagar"));
    }

    #[test]
    fn test_no_block_crosses_bottom_limit() {
        let doc = render_script_document(&script(30));
        assert!(doc.page_count() > 1);

        for page in &doc.pages {
            for op in &page.ops {
                if let DrawOp::Text { y, .. } = op {
                    assert!(*y <= BOTTOM_LIMIT, "baseline {} below limit", y);
                }
            }
        }
    }

    #[test]
    fn test_development_block_is_not_split() {
        let doc = render_script_document(&script(30));
        for page in &doc.pages {
            let lines = page.lines();
            for (i, line) in lines.iter().enumerate() {
                if line.starts_with("Bloco #") {
                    assert!(lines[i + 1].starts_with("Fala: Erro"));
                    assert!(lines[i + 2].starts_with("Ação: "));
                }
            }
        }
    }

    #[test]
    fn test_oversized_block_continues_on_next_pages() {
        let mut script = script(2);
        script.development_blocks[1] = Segment::new("palavra ".repeat(2000), "Corte seco");
        let doc = render_script_document(&script);
        assert!(doc.page_count() > 2);

        for page in &doc.pages {
            for op in &page.ops {
                if let DrawOp::Text { y, text, .. } = op {
                    assert!(*y <= BOTTOM_LIMIT, "baseline {} below limit: {}", y, text);
                    assert!(*y >= TOP_MARGIN - 0.01, "baseline {} above margin: {}", y, text);
                }
            }
        }

        let lines: Vec<&str> = doc.pages.iter().flat_map(|p| p.lines()).collect();
        let words: usize = lines.iter().map(|l| l.matches("palavra").count()).sum();
        assert_eq!(words, 2000);

        let action = lines.iter().rposition(|l| *l == "Ação: Corte seco").unwrap();
        let closing = lines.iter().position(|l| *l == "FECHAMENTO (CTA):").unwrap();
        assert!(action < closing);
        assert!(doc.pages.last().unwrap().lines().contains(&"• Fale devagar"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            file_name("5 Erros  de\tProdutividade"),
            "alurio-roteiro-5-erros-de-produtividade.pdf"
        );
        assert_eq!(file_name("A/B"), "alurio-roteiro-a-b.pdf");
    }
}
