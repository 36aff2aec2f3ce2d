use serde::Serialize;

use crate::models::report::EmissionReport;
use crate::services::report_renderer::display_date;
use crate::utils::format::{format_number, split_label};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrintRow {
    pub source: String,
    pub usage: String,
    pub emission: String,
    pub is_credit: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrintBullet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub body: String,
}

/// Everything a printable renderer needs, independent of page geometry.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrintableReport {
    pub title: String,
    pub generated_on: String,
    pub company_name: String,
    pub total_annual_label: String,
    pub score_label: String,
    pub badge_rgb: [u8; 3],
    pub summary: String,
    pub table_headers: [String; 3],
    pub rows: Vec<PrintRow>,
    pub totals: PrintRow,
    pub recommendations: Vec<PrintBullet>,
    pub predictive_analysis: String,
}

impl PrintableReport {
    pub fn from_report(report: &EmissionReport) -> Self {
        let rows = report
            .breakdown
            .iter()
            .map(|row| PrintRow {
                source: row.source.clone(),
                usage: row.usage.clone(),
                emission: row.emission.clone(),
                is_credit: row.is_credit,
            })
            .collect();

        let recommendations = report
            .recommendations
            .iter()
            .map(|text| {
                let (label, body) = split_label(text);
                PrintBullet {
                    label: label.map(str::to_string),
                    body: body.to_string(),
                }
            })
            .collect();

        Self {
            title: "Sustainability Report".to_string(),
            generated_on: display_date(&report.generated_at),
            company_name: report.company_name.clone(),
            total_annual_label: format!(
                "{} tCO2e / year",
                format_number(report.total_annual_emissions_tco2e, 2)
            ),
            score_label: report.sustainability_score.as_str().to_string(),
            badge_rgb: report.sustainability_score.badge_rgb(),
            summary: report.summary.clone(),
            table_headers: [
                "Source".to_string(),
                "Monthly Usage".to_string(),
                "Emissions".to_string(),
            ],
            rows,
            totals: PrintRow {
                source: "Total (monthly)".to_string(),
                usage: String::new(),
                emission: format!("{} kg CO2e", format_number(report.total_monthly_kg, 2)),
                is_credit: false,
            },
            recommendations,
            predictive_analysis: report.projection.clone(),
        }
    }
}

/// Page geometry in millimetres. Defaults to A4 portrait.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageSetup {
    pub page_height_mm: f64,
    pub margin_mm: f64,
    pub line_height_mm: f64,
    pub chars_per_line: usize,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            page_height_mm: 297.0,
            margin_mm: 20.0,
            line_height_mm: 6.0,
            chars_per_line: 90,
        }
    }
}

impl PageSetup {
    fn bottom(&self) -> f64 {
        self.page_height_mm - self.margin_mm
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum PrintBlock {
    Header {
        title: String,
        company_name: String,
        generated_on: String,
    },
    Summary {
        total_annual_label: String,
        score_label: String,
        badge_rgb: [u8; 3],
        text: String,
    },
    SectionTitle {
        text: String,
    },
    TableHeader {
        headers: [String; 3],
    },
    TableRow {
        row: PrintRow,
    },
    TableTotals {
        row: PrintRow,
    },
    Bullet {
        bullet: PrintBullet,
    },
    Paragraph {
        text: String,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacedBlock {
    pub y_mm: f64,
    pub height_mm: f64,
    pub block: PrintBlock,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrintPage {
    pub number: usize,
    pub blocks: Vec<PlacedBlock>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrintableDocument {
    pub setup: PageSetup,
    pub pages: Vec<PrintPage>,
}

struct Layout<'a> {
    setup: &'a PageSetup,
    pages: Vec<PrintPage>,
    cursor: f64,
}

impl<'a> Layout<'a> {
    fn new(setup: &'a PageSetup) -> Self {
        Self {
            setup,
            pages: vec![PrintPage {
                number: 1,
                blocks: Vec::new(),
            }],
            cursor: setup.margin_mm,
        }
    }

    fn fits(&self, height: f64) -> bool {
        self.cursor + height <= self.setup.bottom()
    }

    fn at_page_top(&self) -> bool {
        self.cursor <= self.setup.margin_mm
    }

    fn break_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(PrintPage {
            number,
            blocks: Vec::new(),
        });
        self.cursor = self.setup.margin_mm;
    }

    /// Starts a new page unless `height` still fits on the current one.
    fn ensure_space(&mut self, height: f64) {
        if !self.fits(height) && !self.at_page_top() {
            self.break_page();
        }
    }

    /// Places a block, starting a new page first when it would overflow.
    fn place(&mut self, block: PrintBlock, height: f64) {
        self.ensure_space(height);
        let y_mm = self.cursor;
        if let Some(page) = self.pages.last_mut() {
            page.blocks.push(PlacedBlock {
                y_mm,
                height_mm: height,
                block,
            });
        }
        self.cursor += height;
    }
}

const HEADER_HEIGHT_MM: f64 = 30.0;
const SUMMARY_PADDING_MM: f64 = 22.0;
const SECTION_TITLE_HEIGHT_MM: f64 = 12.0;
const TABLE_ROW_HEIGHT_MM: f64 = 8.0;
const BLOCK_GAP_MM: f64 = 4.0;

/// Lays the printable report out on pages, breaking whenever the next block
/// does not fit in the space left. Table rows and bullets break one by one,
/// and the table header repeats on every page the table continues onto.
pub fn paginate(report: &PrintableReport, setup: &PageSetup) -> PrintableDocument {
    let mut layout = Layout::new(setup);
    let line = setup.line_height_mm;

    layout.place(
        PrintBlock::Header {
            title: report.title.clone(),
            company_name: report.company_name.clone(),
            generated_on: report.generated_on.clone(),
        },
        HEADER_HEIGHT_MM,
    );

    let summary_lines = wrapped_line_count(&report.summary, setup.chars_per_line);
    layout.place(
        PrintBlock::Summary {
            total_annual_label: report.total_annual_label.clone(),
            score_label: report.score_label.clone(),
            badge_rgb: report.badge_rgb,
            text: report.summary.clone(),
        },
        SUMMARY_PADDING_MM + summary_lines as f64 * line,
    );

    layout.ensure_space(SECTION_TITLE_HEIGHT_MM + 2.0 * TABLE_ROW_HEIGHT_MM);
    layout.place(
        PrintBlock::SectionTitle {
            text: "Emission Breakdown".to_string(),
        },
        SECTION_TITLE_HEIGHT_MM,
    );
    let table_header = PrintBlock::TableHeader {
        headers: report.table_headers.clone(),
    };
    layout.place(table_header.clone(), TABLE_ROW_HEIGHT_MM);
    for row in &report.rows {
        place_table_block(
            &mut layout,
            PrintBlock::TableRow { row: row.clone() },
            &table_header,
        );
    }
    place_table_block(
        &mut layout,
        PrintBlock::TableTotals {
            row: report.totals.clone(),
        },
        &table_header,
    );

    let bullet_heights: Vec<f64> = report
        .recommendations
        .iter()
        .map(|bullet| {
            let text = match &bullet.label {
                Some(label) => format!("{}: {}", label, bullet.body),
                None => bullet.body.clone(),
            };
            wrapped_line_count(&text, setup.chars_per_line) as f64 * line + BLOCK_GAP_MM / 2.0
        })
        .collect();
    layout.ensure_space(SECTION_TITLE_HEIGHT_MM + bullet_heights.first().copied().unwrap_or(0.0));
    layout.place(
        PrintBlock::SectionTitle {
            text: "Recommendations".to_string(),
        },
        SECTION_TITLE_HEIGHT_MM,
    );
    for (bullet, height) in report.recommendations.iter().zip(bullet_heights) {
        layout.place(
            PrintBlock::Bullet {
                bullet: bullet.clone(),
            },
            height,
        );
    }

    let paragraph_lines = wrapped_line_count(&report.predictive_analysis, setup.chars_per_line);
    let paragraph_height = paragraph_lines as f64 * line + BLOCK_GAP_MM;
    layout.ensure_space(SECTION_TITLE_HEIGHT_MM + paragraph_height);
    layout.place(
        PrintBlock::SectionTitle {
            text: "Predictive Analysis".to_string(),
        },
        SECTION_TITLE_HEIGHT_MM,
    );
    layout.place(
        PrintBlock::Paragraph {
            text: report.predictive_analysis.clone(),
        },
        paragraph_height,
    );

    PrintableDocument {
        setup: setup.clone(),
        pages: layout.pages,
    }
}

fn place_table_block(layout: &mut Layout<'_>, block: PrintBlock, table_header: &PrintBlock) {
    if !layout.fits(TABLE_ROW_HEIGHT_MM) {
        layout.break_page();
        layout.place(table_header.clone(), TABLE_ROW_HEIGHT_MM);
    }
    layout.place(block, TABLE_ROW_HEIGHT_MM);
}

/// Number of lines a greedy word wrap produces at the given width.
pub fn wrapped_line_count(text: &str, chars_per_line: usize) -> usize {
    let width = chars_per_line.max(1);
    let mut lines = 0;
    let mut current = 0;

    for word in text.split_whitespace() {
        let len = word.chars().count();
        if current == 0 {
            lines += 1;
            current = len;
        } else if current + 1 + len <= width {
            current += 1 + len;
        } else {
            lines += 1;
            current = len;
        }
        while current > width {
            lines += 1;
            current -= width;
        }
    }

    lines.max(1)
}
