//! PDF serialization of a laid-out [`ScriptDocument`].
//!
//! Uses the base-14 Helvetica family with WinAnsi encoding, so no font
//! program is embedded and the output is byte-for-byte reproducible.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use super::layout::{DrawOp, FontStyle, Page, Rgb, ScriptDocument, PAGE_HEIGHT, PAGE_WIDTH};
use super::metrics::MM_PER_PT;

const FONTS: [(FontStyle, &[u8], &[u8]); 3] = [
    (FontStyle::Regular, b"F1", b"Helvetica"),
    (FontStyle::Bold, b"F2", b"Helvetica-Bold"),
    (FontStyle::Italic, b"F3", b"Helvetica-Oblique"),
];

fn pt(mm: f32) -> f32 {
    mm / MM_PER_PT
}

fn font_name(style: FontStyle) -> Name<'static> {
    let (_, name, _) = FONTS
        .iter()
        .find(|(s, _, _)| *s == style)
        .copied()
        .unwrap_or(FONTS[0]);
    Name(name)
}

fn channel(v: u8) -> f32 {
    v as f32 / 255.0
}

/// Encode text for a WinAnsi simple font; unmappable characters become `?`
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

fn page_content(page: &Page) -> Vec<u8> {
    let mut content = Content::new();

    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                style,
                color,
                text,
            } => {
                let Rgb(r, g, b) = *color;
                content.set_fill_rgb(channel(r), channel(g), channel(b));
                content.begin_text();
                content.set_font(font_name(*style), *size);
                content.next_line(pt(*x), pt(PAGE_HEIGHT - *y));
                content.show(Str(&win_ansi(text)));
                content.end_text();
            }
            DrawOp::Rule { x1, x2, y, color } => {
                let Rgb(r, g, b) = *color;
                content.set_stroke_rgb(channel(r), channel(g), channel(b));
                content.set_line_width(0.57);
                content.move_to(pt(*x1), pt(PAGE_HEIGHT - *y));
                content.line_to(pt(*x2), pt(PAGE_HEIGHT - *y));
                content.stroke();
            }
        }
    }

    content.finish()
}

impl ScriptDocument {
    /// Serialize to PDF bytes
    pub fn to_pdf(&self) -> Vec<u8> {
        let mut next_id = 1;
        let mut alloc = || {
            let id = Ref::new(next_id);
            next_id += 1;
            id
        };

        let catalog_id = alloc();
        let tree_id = alloc();
        let info_id = alloc();
        let font_ids: Vec<Ref> = FONTS.iter().map(|_| alloc()).collect();
        let page_ids: Vec<(Ref, Ref)> = self.pages.iter().map(|_| (alloc(), alloc())).collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id)
            .kids(page_ids.iter().map(|(page, _)| *page))
            .count(page_ids.len() as i32);
        pdf.document_info(info_id)
            .title(TextStr(&self.title))
            .producer(TextStr("alurio"));

        for ((_, _, base), id) in FONTS.iter().zip(&font_ids) {
            pdf.type1_font(*id)
                .base_font(Name(base))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        let media_box = Rect::new(0.0, 0.0, pt(PAGE_WIDTH), pt(PAGE_HEIGHT));
        for (page, (page_id, content_id)) in self.pages.iter().zip(&page_ids) {
            let mut writer = pdf.page(*page_id);
            writer.media_box(media_box);
            writer.parent(tree_id);
            writer.contents(*content_id);
            {
                let mut resources = writer.resources();
                let mut fonts = resources.fonts();
                for ((_, name, _), id) in FONTS.iter().zip(&font_ids) {
                    fonts.pair(Name(name), *id);
                }
            }
            writer.finish();

            pdf.stream(*content_id, &page_content(page));
        }

        pdf.finish()
    }
}
