//! Renders a validated itinerary to a paginated PDF.

use std::fmt::Debug;

use lopdf::{
    content::{Content, Operation},
    dictionary, Document, Object, ObjectId, Stream, StringFormat,
};
use tracing::debug;

use crate::{
    error::{PlannerError, Result},
    types::ItineraryResult,
};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;

const TITLE_SIZE: f32 = 20.0;
const HEADING_SIZE: f32 = 15.0;
const SUBHEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 11.0;

/// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

const BULLET: &str = "\u{2022}";

/// Turns a validated itinerary into a document a traveler can download.
pub trait Renderer: Send + Sync + Debug {
    fn render(&self, itinerary: &ItineraryResult) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    title: Option<String>,
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl Renderer for PdfRenderer {
    fn render(&self, itinerary: &ItineraryResult) -> Result<Vec<u8>> {
        let mut layout = Layout::default();
        layout.line(
            Font::Bold,
            TITLE_SIZE,
            self.title.as_deref().unwrap_or("Travel Itinerary"),
        );
        layout.gap(BODY_SIZE);

        for day in &itinerary.days {
            layout.keep_room(HEADING_SIZE * 4.0);
            layout.line(Font::Bold, HEADING_SIZE, &format!("Day {}", day.day));

            for (section, activities) in day.sections.iter() {
                if activities.is_empty() {
                    continue;
                }
                layout.keep_room(SUBHEADING_SIZE * 3.0);
                layout.line(Font::Bold, SUBHEADING_SIZE, section.title());
                for activity in activities {
                    layout.paragraph(Font::Regular, BODY_SIZE, &format!("{} {}", BULLET, activity));
                }
            }
            layout.gap(BODY_SIZE);
        }

        layout.keep_room(HEADING_SIZE * 3.0);
        layout.line(Font::Bold, HEADING_SIZE, "Summary");
        for paragraph in itinerary.summary.lines() {
            if paragraph.trim().is_empty() {
                layout.gap(BODY_SIZE / 2.0);
            } else {
                layout.paragraph(Font::Regular, BODY_SIZE, paragraph);
            }
        }

        let pages = layout.finish();
        let bytes = write_document(pages)?;
        debug!(
            target: "trip::render",
            days = itinerary.day_count(),
            bytes = bytes.len(),
            "itinerary rendered"
        );
        Ok(bytes)
    }
}

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// Top-down line cursor that starts a new page when the bottom margin is hit.
struct Layout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }
}

impl Layout {
    fn line(&mut self, font: Font, size: f32, text: &str) {
        let leading = size * 1.4;
        if self.y - leading < MARGIN {
            self.break_page();
        }
        self.y -= leading;

        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.resource().into(), size.into()]),
            Operation::new("Td", vec![MARGIN.into(), self.y.into()]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn paragraph(&mut self, font: Font, size: f32, text: &str) {
        for line in wrap(text, max_chars(size)) {
            self.line(font, size, &line);
        }
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    fn keep_room(&mut self, height: f32) {
        if self.y - height < MARGIN {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

fn write_document(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|err| PlannerError::Render(format!("Failed to encode page content: {err}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|err| PlannerError::Render(format!("Failed to write PDF: {err}")))?;
    Ok(buffer)
}

fn max_chars(size: f32) -> usize {
    ((PAGE_WIDTH - 2.0 * MARGIN) / (size * GLYPH_WIDTH)) as usize
}

/// Greedy word wrap. Words longer than a line are hard-split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split_at = word
                .char_indices()
                .nth(width)
                .map(|(index, _)| index)
                .unwrap_or(word.len());
            let rest = word.split_off(split_at);
            lines.push(word);
            word = rest;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Encode for the standard fonts' WinAnsiEncoding. Unmappable characters become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\u{20}'..='\u{7e}' => ch as u8,
            '\u{a0}'..='\u{ff}' => ch as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}
