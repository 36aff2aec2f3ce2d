use chrono::DateTime;

use crate::error::AppResult;
use crate::models::report::{EmissionReport, ReportExportFormat};
use crate::services::printable::{paginate, PageSetup, PrintableReport};
use crate::utils::format::{escape_html, format_number, split_label};

/// Turns a finished report into one output format.
pub trait ReportRenderer: Send + Sync {
    fn format(&self) -> ReportExportFormat;
    fn render(&self, report: &EmissionReport) -> AppResult<String>;
}

pub fn renderer_for(format: ReportExportFormat) -> Box<dyn ReportRenderer> {
    match format {
        ReportExportFormat::Html => Box::new(HtmlReportRenderer),
        ReportExportFormat::Markdown => Box::new(MarkdownReportRenderer),
        ReportExportFormat::Json => Box::new(JsonReportRenderer),
        ReportExportFormat::Print => Box::new(PrintLayoutRenderer::default()),
    }
}

/// Human-readable generation date, falling back to the raw timestamp.
pub fn display_date(generated_at: &str) -> String {
    DateTime::parse_from_rfc3339(generated_at)
        .map(|value| value.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| generated_at.to_string())
}

const REPORT_STYLE: &str = r#"
  .eco-report { font-family: 'Segoe UI', Arial, sans-serif; color: #1f2937; max-width: 880px; margin: 0 auto; padding: 24px; }
  .eco-report header { border-bottom: 3px solid #15803d; margin-bottom: 20px; }
  .eco-report h1 { color: #15803d; margin: 0 0 4px; }
  .eco-report h2 { color: #166534; margin-top: 28px; }
  .eco-report .meta { color: #6b7280; font-size: 0.9em; margin: 2px 0; }
  .eco-report .summary { background: #f0fdf4; border-radius: 8px; padding: 16px; }
  .eco-report .badge { display: inline-block; color: #ffffff; font-weight: 600; padding: 4px 12px; border-radius: 999px; }
  .eco-report .total { font-size: 1.6em; font-weight: 700; margin: 8px 0; }
  .eco-report table { width: 100%; border-collapse: collapse; }
  .eco-report th, .eco-report td { border: 1px solid #d1d5db; padding: 8px; text-align: left; }
  .eco-report th { background: #dcfce7; }
  .eco-report tr.credit td { color: #15803d; }
  .eco-report tfoot td { font-weight: 700; background: #f9fafb; }
  .eco-report .notice { color: #92400e; font-style: italic; }
"#;

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlReportRenderer;

impl HtmlReportRenderer {
    /// Self-contained styled fragment for inline display.
    pub fn render_markup(&self, report: &EmissionReport) -> String {
        let band = report.sustainability_score;
        let mut html = String::new();
        html.push_str("<div class=\"eco-report\">\n<style>");
        html.push_str(REPORT_STYLE);
        html.push_str("</style>\n<header>\n<h1>Sustainability Report</h1>\n");
        html.push_str(&format!(
            "<p class=\"meta\">Company: {}</p>\n<p class=\"meta\">Generated on: {}</p>\n</header>\n",
            escape_html(&report.company_name),
            escape_html(&display_date(&report.generated_at))
        ));

        html.push_str("<section class=\"summary\">\n<h2>Executive Summary</h2>\n");
        html.push_str(&format!(
            "<p class=\"total\">{} tCO2e / year</p>\n<p>Sustainability Score: <span class=\"badge\" style=\"background:{}\">{}</span></p>\n<p>{}</p>\n",
            format_number(report.total_annual_emissions_tco2e, 2),
            band.badge_color(),
            band.as_str(),
            escape_html(&report.summary)
        ));
        if report.is_sample_data {
            html.push_str(
                "<p class=\"notice\">Figures below use sample values because no operational data was supplied.</p>\n",
            );
        }
        html.push_str("</section>\n");

        html.push_str("<section>\n<h2>Emission Breakdown</h2>\n<table>\n<thead><tr><th>Source</th><th>Monthly Usage</th><th>Emissions</th></tr></thead>\n<tbody>\n");
        for row in &report.breakdown {
            let class = if row.is_credit { " class=\"credit\"" } else { "" };
            html.push_str(&format!(
                "<tr{}><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                class,
                escape_html(&row.source),
                escape_html(&row.usage),
                escape_html(&row.emission)
            ));
        }
        html.push_str(&format!(
            "</tbody>\n<tfoot><tr><td>Total (monthly)</td><td></td><td>{} kg CO2e</td></tr></tfoot>\n</table>\n</section>\n",
            format_number(report.total_monthly_kg, 2)
        ));

        html.push_str("<section>\n<h2>Recommendations</h2>\n<ul>\n");
        for recommendation in &report.recommendations {
            match split_label(recommendation) {
                (Some(label), body) => html.push_str(&format!(
                    "<li><strong>{}:</strong> {}</li>\n",
                    escape_html(label),
                    escape_html(body)
                )),
                (None, body) => html.push_str(&format!("<li>{}</li>\n", escape_html(body))),
            }
        }
        html.push_str("</ul>\n</section>\n");

        html.push_str(&format!(
            "<section>\n<h2>Predictive Analysis</h2>\n<p>{}</p>\n</section>\n</div>\n",
            escape_html(&report.projection)
        ));
        html
    }
}

impl ReportRenderer for HtmlReportRenderer {
    fn format(&self) -> ReportExportFormat {
        ReportExportFormat::Html
    }

    fn render(&self, report: &EmissionReport) -> AppResult<String> {
        let mut document = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        document.push_str(&format!(
            "<title>Sustainability Report - {}</title>\n</head>\n<body>\n",
            escape_html(&report.company_name)
        ));
        document.push_str(&self.render_markup(report));
        document.push_str("</body>\n</html>\n");
        Ok(document)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownReportRenderer;

impl ReportRenderer for MarkdownReportRenderer {
    fn format(&self) -> ReportExportFormat {
        ReportExportFormat::Markdown
    }

    fn render(&self, report: &EmissionReport) -> AppResult<String> {
        let mut content = String::new();
        content.push_str("# Sustainability Report\n\n");
        content.push_str(&format!("Company: {}\n\n", report.company_name));
        content.push_str(&format!(
            "Generated on: {}\n\n",
            display_date(&report.generated_at)
        ));

        content.push_str("## Executive Summary\n");
        content.push_str(&format!(
            "- Annual emissions: {} tCO2e\n- Sustainability score: {}\n\n{}\n\n",
            format_number(report.total_annual_emissions_tco2e, 2),
            report.sustainability_score,
            report.summary
        ));

        content.push_str("## Emission Breakdown\n");
        content.push_str("| Source | Monthly Usage | Emissions |\n|---|---|---|\n");
        for row in &report.breakdown {
            content.push_str(&format!(
                "| {} | {} | {} |\n",
                row.source, row.usage, row.emission
            ));
        }
        content.push_str(&format!(
            "| **Total (monthly)** | | **{} kg CO2e** |\n\n",
            format_number(report.total_monthly_kg, 2)
        ));

        content.push_str("## Recommendations\n");
        for recommendation in &report.recommendations {
            match split_label(recommendation) {
                (Some(label), body) => content.push_str(&format!("- **{}:** {}\n", label, body)),
                (None, body) => content.push_str(&format!("- {}\n", body)),
            }
        }
        content.push('\n');

        content.push_str("## Predictive Analysis\n");
        content.push_str(&report.projection);
        content.push('\n');
        Ok(content)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReportRenderer;

impl ReportRenderer for JsonReportRenderer {
    fn format(&self) -> ReportExportFormat {
        ReportExportFormat::Json
    }

    fn render(&self, report: &EmissionReport) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

/// Emits the paginated printable layout as JSON for a PDF collaborator.
#[derive(Debug, Default, Clone)]
pub struct PrintLayoutRenderer {
    pub setup: PageSetup,
}

impl ReportRenderer for PrintLayoutRenderer {
    fn format(&self) -> ReportExportFormat {
        ReportExportFormat::Print
    }

    fn render(&self, report: &EmissionReport) -> AppResult<String> {
        let document = paginate(&PrintableReport::from_report(report), &self.setup);
        Ok(serde_json::to_string_pretty(&document)?)
    }
}
