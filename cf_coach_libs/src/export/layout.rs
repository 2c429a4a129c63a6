//! Backend-independent page model. Coordinates are millimetres on an A4
//! portrait page, measured from the top-left corner.

use crate::{
    color::{Rgb, ACCENT, BLACK, GRID, MUTED, STRIPE, WHITE},
    table::Table,
};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 14.0;
pub const CONTENT_WIDTH: f32 = 180.0;

const TOP: f32 = 20.0;
const BOTTOM_LIMIT: f32 = PAGE_HEIGHT - 20.0;
const ROW_HEIGHT: f32 = 8.0;
const CELL_PADDING: f32 = 2.0;
const TABLE_FONT_SIZE: f32 = 9.0;
const BODY_FONT_SIZE: f32 = 10.0;
const LINE_HEIGHT: f32 = 5.0;
const PT_TO_MM: f32 = 0.3528;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// `y` is the text baseline.
    Text {
        x: f32,
        y: f32,
        size: f32,
        weight: Weight,
        color: Rgb,
        text: String,
    },
    Fill {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.elements.iter().filter_map(|element| match element {
            Element::Text { text, .. } => Some(text.as_str()),
            Element::Fill { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.pages.iter().flat_map(|page| page.texts())
    }
}

/// Approximate advance width of Helvetica text, half an em per glyph.
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5 * PT_TO_MM
}

fn chars_per_width(size: f32, width: f32) -> usize {
    ((width / text_width("m", size)).floor() as usize).max(1)
}

/// Greedy word wrap. Source line breaks are kept and words longer than a line
/// are split.
pub fn wrap(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for source in text.lines() {
        let mut current = String::new();
        for word in source.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if text_width(&candidate, size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let chars = word.chars().collect::<Vec<char>>();
            let mut chunks = chars
                .chunks(chars_per_width(size, max_width))
                .map(|chunk| chunk.iter().collect::<String>())
                .collect::<Vec<String>>();
            current = chunks.pop().unwrap_or_default();
            lines.extend(chunks);
        }
        lines.push(current);
    }

    lines
}

/// Truncates `text` with an ellipsis so it fits in `width`.
pub fn fit(text: &str, size: f32, width: f32) -> String {
    if text_width(text, size) <= width {
        return text.to_string();
    }
    let keep = chars_per_width(size, width).saturating_sub(3);
    format!("{}...", text.chars().take(keep).collect::<String>())
}

/// Paints the body cells of one column with a value-dependent background.
#[derive(Clone, Copy)]
pub struct Highlight {
    pub column: usize,
    pub color: fn(&str) -> Option<Rgb>,
}

pub struct Layout {
    title: String,
    pages: Vec<Page>,
    y: f32,
}

impl Layout {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            pages: vec![Page::default()],
            y: TOP,
        }
    }

    pub fn cursor(&self) -> f32 {
        self.y
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn push(&mut self, element: Element) {
        match self.pages.last_mut() {
            Some(page) => page.elements.push(element),
            None => self.pages.push(Page {
                elements: vec![element],
            }),
        }
    }

    fn page_is_blank(&self) -> bool {
        self.pages
            .last()
            .map(|page| page.elements.is_empty())
            .unwrap_or(true)
    }

    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = TOP;
    }

    pub fn ensure_space(&mut self, height: f32) {
        if self.y + height > BOTTOM_LIMIT {
            self.new_page();
        }
    }

    pub fn advance(&mut self, height: f32) {
        self.y += height;
    }

    pub fn fill(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.push(Element::Fill {
            x,
            y,
            width,
            height,
            color,
        });
    }

    pub fn text(&mut self, x: f32, y: f32, size: f32, weight: Weight, color: Rgb, text: &str) {
        self.push(Element::Text {
            x,
            y,
            size,
            weight,
            color,
            text: text.to_string(),
        });
    }

    pub fn centered_text(&mut self, y: f32, size: f32, weight: Weight, color: Rgb, text: &str) {
        let x = ((PAGE_WIDTH - text_width(text, size)) / 2.0).max(0.0);
        self.text(x, y, size, weight, color, text);
    }

    /// Full-width title band at the top of the current page.
    pub fn cover(&mut self, title: &str, subtitle: &str) {
        self.fill(0.0, 0.0, PAGE_WIDTH, 50.0, ACCENT);
        self.centered_text(30.0, 24.0, Weight::Bold, WHITE, title);
        self.centered_text(40.0, 16.0, Weight::Bold, WHITE, subtitle);
        self.y = 60.0;
    }

    /// Starts a section on a fresh page with an underlined heading.
    pub fn section(&mut self, heading: &str) {
        if !self.page_is_blank() {
            self.new_page();
        }
        self.text(MARGIN, TOP, 18.0, Weight::Bold, ACCENT, heading);
        self.fill(MARGIN, TOP + 2.0, text_width(heading, 18.0), 0.3, GRID);
        self.y = TOP + 10.0;
    }

    pub fn subheading(&mut self, heading: &str) {
        self.ensure_space(10.0 + ROW_HEIGHT * 2.0);
        self.y += 5.0;
        self.text(MARGIN, self.y, 14.0, Weight::Bold, ACCENT, heading);
        self.y += 5.0;
    }

    pub fn paragraph(&mut self, text: &str) {
        for line in wrap(text, BODY_FONT_SIZE, CONTENT_WIDTH) {
            self.ensure_space(LINE_HEIGHT);
            self.text(MARGIN, self.y, BODY_FONT_SIZE, Weight::Regular, BLACK, &line);
            self.y += LINE_HEIGHT;
        }
        self.y += LINE_HEIGHT;
    }

    fn table_header(&mut self, table: &Table, column_width: f32) {
        self.fill(MARGIN, self.y, CONTENT_WIDTH, ROW_HEIGHT, ACCENT);
        for (i, head) in table.head.iter().enumerate() {
            let x = MARGIN + column_width * i as f32;
            let head = fit(head, TABLE_FONT_SIZE, column_width - CELL_PADDING * 2.0);
            self.text(
                x + CELL_PADDING,
                self.y + 5.5,
                TABLE_FONT_SIZE,
                Weight::Bold,
                WHITE,
                &head,
            );
        }
        self.y += ROW_HEIGHT;
    }

    /// Grid table spanning the content width. The header row is repeated on
    /// every page the body spills onto.
    pub fn table(&mut self, table: &Table, highlights: &[Highlight]) {
        if table.head.is_empty() {
            return;
        }
        let column_width = CONTENT_WIDTH / table.head.len() as f32;

        self.ensure_space(ROW_HEIGHT * 2.0);
        self.table_header(table, column_width);

        for (i, row) in table.body.iter().enumerate() {
            if self.y + ROW_HEIGHT > BOTTOM_LIMIT {
                self.new_page();
                self.table_header(table, column_width);
            }
            if i % 2 == 1 {
                self.fill(MARGIN, self.y, CONTENT_WIDTH, ROW_HEIGHT, STRIPE);
            }

            for (j, cell) in row.iter().enumerate() {
                let x = MARGIN + column_width * j as f32;
                let background = highlights
                    .iter()
                    .find(|highlight| highlight.column == j)
                    .and_then(|highlight| (highlight.color)(cell));
                let color = match background {
                    Some(background) => {
                        self.fill(x, self.y, column_width, ROW_HEIGHT, background);
                        WHITE
                    }
                    None => BLACK,
                };
                let cell = fit(cell, TABLE_FONT_SIZE, column_width - CELL_PADDING * 2.0);
                self.text(
                    x + CELL_PADDING,
                    self.y + 5.5,
                    TABLE_FONT_SIZE,
                    Weight::Regular,
                    color,
                    &cell,
                );
            }

            self.fill(MARGIN, self.y + ROW_HEIGHT - 0.2, CONTENT_WIDTH, 0.2, GRID);
            self.y += ROW_HEIGHT;
        }

        self.y += 6.0;
    }

    /// Centered muted line near the bottom edge of the last page.
    pub fn footer(&mut self, text: &str) {
        self.centered_text(PAGE_HEIGHT - 10.0, 10.0, Weight::Regular, MUTED, text);
    }

    pub fn finish(self) -> Document {
        Document {
            title: self.title,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn numbers(rows: usize) -> Table {
        Table::new(
            &["N", "Square"],
            (0..rows)
                .map(|i| vec![i.to_string(), (i * i).to_string()])
                .collect(),
        )
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "lorem ipsum dolor sit amet ".repeat(40);
        let lines = wrap(&text, 10.0, 180.0);
        assert!(lines.len() > 1);
        assert!(lines
            .iter()
            .all(|line| text_width(line, 10.0) <= 180.0));
        assert_eq!(
            lines.join(" ").split_whitespace().count(),
            text.split_whitespace().count()
        );
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap(&"x".repeat(500), 10.0, 180.0);
        assert!(lines.len() >= 5);
        assert_eq!(lines.concat().len(), 500);
    }

    #[test]
    fn test_wrap_keeps_line_breaks() {
        assert_eq!(wrap("a\nb", 10.0, 180.0), vec!["a", "b"]);
        assert!(wrap("", 10.0, 180.0).is_empty());
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("short", 9.0, 40.0), "short");
        let long = fit(&"y".repeat(100), 9.0, 40.0);
        assert!(long.ends_with("..."));
        assert!(long.chars().count() < 100);
    }

    #[test]
    fn test_table_repeats_header_on_new_page() {
        let mut layout = Layout::new("numbers");
        layout.table(&numbers(60), &[]);
        let document = layout.finish();

        assert!(document.pages.len() >= 2);
        for page in document.pages.iter() {
            assert_eq!(page.texts().filter(|text| *text == "Square").count(), 1);
        }
        let cells = document
            .texts()
            .filter(|text| *text != "N" && *text != "Square")
            .count();
        assert_eq!(cells, 120);
    }

    #[test]
    fn test_section_starts_new_page() {
        let mut layout = Layout::new("sections");
        layout.section("First");
        layout.paragraph("body");
        layout.section("Second");
        assert_eq!(layout.page_count(), 2);

        let document = layout.finish();
        assert_eq!(document.pages[1].texts().next(), Some("Second"));
    }

    #[test]
    fn test_highlight_paints_cell() {
        let mut layout = Layout::new("highlight");
        let table = Table::new(&["Verdict"], vec![vec![String::from("OK")]]);
        layout.table(
            &table,
            &[Highlight {
                column: 0,
                color: |value| (value == "OK").then_some(Rgb(1, 2, 3)),
            }],
        );
        let document = layout.finish();
        assert!(document.pages[0].elements.iter().any(|element| matches!(
            element,
            Element::Fill { color, .. } if *color == Rgb(1, 2, 3)
        )));
    }
}
